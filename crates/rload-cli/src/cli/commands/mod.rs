//! CLI command handlers. Each command is in its own file.

mod config;
mod load;
mod prioritized;
mod status;
mod wait;

pub use config::run_config;
pub use load::run_load;
pub use prioritized::run_prioritized;
pub use status::run_status;
pub use wait::run_wait;

use anyhow::Result;
use rload_core::config::LoaderConfig;
use rload_core::descriptor::LoadOutcome;
use rload_core::environment::{AnyInjector, Document, FsInjector, HttpInjector};
use rload_core::loader::ScriptLoader;
use rload_core::manifest::Manifest;
use std::sync::Arc;

use super::LoadArgs;

/// Read the manifest and build a loader whose injectors attach into a fresh document.
pub(super) fn prepare(
    mut cfg: LoaderConfig,
    args: &LoadArgs,
) -> Result<(Manifest, ScriptLoader<AnyInjector>)> {
    args.apply(&mut cfg);
    let manifest = Manifest::load(&args.manifest)?;
    let document = Document::new();
    let injector = AnyInjector {
        fs: FsInjector::new(args.resolved_root(), document.clone()),
        http: HttpInjector::new(document.clone()).with_transfer_timeout(cfg.default_timeout()),
    };
    let loader = ScriptLoader::with_capabilities(injector, cfg, Arc::new(document));
    Ok((manifest, loader))
}

pub(super) fn print_outcomes(outcomes: &[LoadOutcome]) {
    for o in outcomes {
        let state = if o.success { "ok" } else { "skipped" };
        match &o.error {
            Some(e) => println!("{:<8} {:<24} {}", state, o.name, e),
            None => println!("{:<8} {}", state, o.name),
        }
    }
}
