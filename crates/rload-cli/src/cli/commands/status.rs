//! `rload status` – load a manifest and print the loader status as JSON.

use anyhow::Result;
use rload_core::config::LoaderConfig;
use serde_json::json;

use super::prepare;
use crate::cli::LoadArgs;

pub async fn run_status(cfg: LoaderConfig, args: &LoadArgs) -> Result<()> {
    let (manifest, loader) = prepare(cfg, args)?;
    let max_concurrent = loader.config().max_concurrent;
    let outcomes = loader
        .load_many_bounded(&manifest.resources, max_concurrent)
        .await;

    let cached: Vec<_> = loader
        .cached_records()
        .into_iter()
        .map(|(url, record)| json!({ "url": url, "name": record.name }))
        .collect();
    let report = json!({
        "status": loader.status(),
        "cached": cached,
        "outcomes": outcomes.as_ref().ok(),
        "error": outcomes.as_ref().err().map(|e| e.to_string()),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
