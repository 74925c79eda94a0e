//! `rload config` – show the effective configuration.

use anyhow::Result;
use rload_core::config::{self, LoaderConfig};
use rload_core::logging;
use std::path::Path;

pub fn run_config(cfg: &LoaderConfig, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# {}", path.display());
    if let Ok(log) = logging::log_path() {
        println!("# log: {}", log.display());
    }
    print!("{}", toml_string(cfg)?);
    Ok(())
}

fn toml_string(cfg: &LoaderConfig) -> Result<String> {
    Ok(toml::to_string_pretty(cfg)?)
}
