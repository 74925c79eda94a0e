//! Tracing setup for the `rload` binary.
//!
//! Events go to `$XDG_STATE_HOME/rload/rload.log`; when that file cannot be
//! opened the CLI falls back to stderr. Filtering comes from `RLOAD_LOG`
//! (same syntax as `RUST_LOG`).

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "RLOAD_LOG";

const DEFAULT_FILTER: &str = "info,rload=debug,rload_core=debug";

/// Where `init_logging` writes.
pub fn log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rload")?;
    Ok(xdg_dirs.get_state_home().join("rload").join("rload.log"))
}

/// Filter from `directives`, falling back to the default when unset, blank or unparsable.
fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

fn env_filter() -> EnvFilter {
    filter_from(std::env::var(LOG_ENV).ok().as_deref())
}

/// Install a subscriber appending to the state-dir log file.
/// Returns Err when the file cannot be opened so the caller can use stderr instead.
pub fn init_logging() -> Result<()> {
    let path = log_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {}", e))?;

    tracing::info!(
        path = %path.display(),
        version = env!("CARGO_PKG_VERSION"),
        "logging initialized"
    );
    Ok(())
}

/// Stderr-only subscriber for when `init_logging` fails.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
