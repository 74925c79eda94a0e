use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Backoff parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Base delay in seconds; attempt `k` waits `base * 2^k`.
    pub base_delay_secs: f64,
    /// Optional cap on the backoff delay in seconds; unset means no cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_delay_secs: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_secs: 1.0,
            max_delay_secs: None,
        }
    }
}

/// Loader configuration loaded from `~/.config/rload/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Per-attempt timeout for a single resource, in milliseconds.
    pub default_timeout_ms: u64,
    /// Retries after the first attempt (total attempts = max_retries + 1).
    pub max_retries: u32,
    /// Maximum concurrent loads in a bounded batch.
    pub max_concurrent: usize,
    /// Poll interval for name barriers, in milliseconds.
    pub poll_interval_ms: u64,
    /// Delay before the medium-priority tier starts.
    pub medium_delay_ms: u64,
    /// Delay before the low-priority tier starts.
    pub low_delay_ms: u64,
    /// Whether `shutdown` cancels tiers that have not started yet.
    #[serde(default = "default_cancel_on_shutdown")]
    pub cancel_pending_tiers_on_shutdown: bool,
    /// Optional backoff policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

fn default_cancel_on_shutdown() -> bool {
    true
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: 10_000,
            max_retries: 2,
            max_concurrent: 5,
            poll_interval_ms: 100,
            medium_delay_ms: 1_000,
            low_delay_ms: 3_000,
            cancel_pending_tiers_on_shutdown: true,
            retry: None,
        }
    }
}

impl LoaderConfig {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn medium_delay(&self) -> Duration {
        Duration::from_millis(self.medium_delay_ms)
    }

    pub fn low_delay(&self) -> Duration {
        Duration::from_millis(self.low_delay_ms)
    }

    /// Backoff policy from the `[retry]` section, or the default.
    ///
    /// Fails if `base_delay_secs` is negative, NaN or too large for a `Duration`.
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        let Some(r) = &self.retry else {
            return Ok(RetryPolicy::default());
        };
        let base_delay = Duration::try_from_secs_f64(r.base_delay_secs)
            .with_context(|| format!("invalid retry.base_delay_secs {}", r.base_delay_secs))?;
        Ok(RetryPolicy {
            base_delay,
            max_delay: r.max_delay_secs.map(Duration::from_secs),
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rload")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<LoaderConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = LoaderConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit path.
pub fn load_from_path(path: &Path) -> Result<LoaderConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: LoaderConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    cfg.retry_policy()
        .with_context(|| format!("validating config {}", path.display()))?;
    Ok(cfg)
}
