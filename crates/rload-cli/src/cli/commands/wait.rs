//! `rload wait` – tiered load, then block until the named resources are ready.

use anyhow::Result;
use rload_core::config::LoaderConfig;
use std::time::Duration;

use super::prepare;
use crate::cli::LoadArgs;

pub async fn run_wait(
    cfg: LoaderConfig,
    args: &LoadArgs,
    names: &[String],
    wait_ms: u64,
) -> Result<()> {
    let (manifest, loader) = prepare(cfg, args)?;
    let load = loader.load_prioritized(&manifest.resources).await;
    if let Err(e) = &load.high {
        // Names from later tiers may still arrive; the barrier decides.
        tracing::warn!("high tier failed: {}", e);
    }

    let ready = loader
        .wait_for_names(names, Duration::from_millis(wait_ms))
        .await;
    // Nothing else waits on the scheduled tiers once the barrier has settled.
    loader.shutdown();
    ready?;

    println!("ready: {}", names.join(", "));
    Ok(())
}
