//! `rload load` – bounded load of every resource in a manifest.

use anyhow::Result;
use rload_core::config::LoaderConfig;

use super::{prepare, print_outcomes};
use crate::cli::LoadArgs;

pub async fn run_load(cfg: LoaderConfig, args: &LoadArgs, jobs: Option<usize>) -> Result<()> {
    let (manifest, loader) = prepare(cfg, args)?;
    let jobs = jobs.unwrap_or(loader.config().max_concurrent);
    tracing::info!(
        manifest = %args.manifest.display(),
        resources = manifest.resources.len(),
        jobs,
        "loading manifest"
    );

    let outcomes = loader.load_many_bounded(&manifest.resources, jobs).await?;
    print_outcomes(&outcomes);

    let status = loader.status();
    println!(
        "loaded {} resource(s): {}",
        status.loaded_count,
        status.load_order.join(" -> ")
    );
    Ok(())
}
