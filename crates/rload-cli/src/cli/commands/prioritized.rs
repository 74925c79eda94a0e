//! `rload prioritized` – tiered load; waits for the medium and low tiers too.

use anyhow::Result;
use rload_core::config::LoaderConfig;
use rload_core::loader::{TierHandle, TierOutcome};

use super::{prepare, print_outcomes};
use crate::cli::LoadArgs;

pub async fn run_prioritized(cfg: LoaderConfig, args: &LoadArgs) -> Result<()> {
    let (manifest, loader) = prepare(cfg, args)?;
    let load = loader.load_prioritized(&manifest.resources).await;

    println!("[high]");
    let high = load.high?;
    print_outcomes(&high);

    let mut failed = None;
    for handle in [load.medium, load.low] {
        if let Some(e) = report_tier(handle).await {
            failed.get_or_insert(e);
        }
    }
    if let Some(e) = failed {
        return Err(e.into());
    }

    println!("load order: {}", loader.status().load_order.join(" -> "));
    Ok(())
}

async fn report_tier(handle: TierHandle) -> Option<rload_core::error::LoadError> {
    let label = format!("{:?}", handle.priority()).to_lowercase();
    match handle.join().await {
        TierOutcome::Empty => None,
        TierOutcome::Cancelled => {
            println!("[{}] cancelled", label);
            None
        }
        TierOutcome::Completed(outcomes) => {
            println!("[{}]", label);
            print_outcomes(&outcomes);
            None
        }
        TierOutcome::Failed(e) => {
            println!("[{}] failed: {}", label, e);
            Some(e)
        }
    }
}
