//! CLI for the rload resource loader.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use rload_core::config::{self, LoaderConfig};
use std::path::PathBuf;

use commands::{run_config, run_load, run_prioritized, run_status, run_wait};

/// Top-level CLI for the rload resource loader.
#[derive(Debug, Parser)]
#[command(name = "rload")]
#[command(about = "rload: cached, bounded-concurrency script/style loader", long_about = None)]
pub struct Cli {
    /// Use this config file instead of ~/.config/rload/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Options shared by commands that load a manifest.
#[derive(Debug, Clone, Args)]
pub struct LoadArgs {
    /// Manifest file listing the resources.
    pub manifest: PathBuf,
    /// Directory relative resource paths are resolved against (default: manifest's directory).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
    /// Retries per resource after the first attempt (overrides config).
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,
    /// Per-attempt timeout in milliseconds (overrides config).
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

impl LoadArgs {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, cfg: &mut LoaderConfig) {
        if let Some(retries) = self.retries {
            cfg.max_retries = retries;
        }
        if let Some(ms) = self.timeout_ms {
            cfg.default_timeout_ms = ms;
        }
    }

    pub fn resolved_root(&self) -> PathBuf {
        match &self.root {
            Some(root) => root.clone(),
            None => self
                .manifest
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Load every resource in a manifest with bounded concurrency.
    Load {
        #[command(flatten)]
        args: LoadArgs,
        /// Maximum concurrent loads (overrides config).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// Load a manifest by priority tier and wait for every tier to finish.
    Prioritized {
        #[command(flatten)]
        args: LoadArgs,
    },

    /// Load a manifest by priority tier and wait until the named resources are ready.
    Wait {
        #[command(flatten)]
        args: LoadArgs,
        /// Names to wait for.
        #[arg(long = "name", required = true, value_name = "NAME")]
        names: Vec<String>,
        /// How long to wait for the names, in milliseconds.
        #[arg(long, default_value = "10000", value_name = "MS")]
        wait_ms: u64,
    },

    /// Load a manifest, then print the loader status as JSON.
    Status {
        #[command(flatten)]
        args: LoadArgs,
    },

    /// Show the effective configuration.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Load { args, jobs } => run_load(cfg, &args, jobs).await?,
            CliCommand::Prioritized { args } => run_prioritized(cfg, &args).await?,
            CliCommand::Wait {
                args,
                names,
                wait_ms,
            } => run_wait(cfg, &args, &names, wait_ms).await?,
            CliCommand::Status { args } => run_status(cfg, &args).await?,
            CliCommand::Config => run_config(&cfg, cli.config.as_deref())?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
