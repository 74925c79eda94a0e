//! Script/style resource loader.
//!
//! Loads external resources through a `ResourceInjector`, caching completed
//! loads and coalescing concurrent requests for the same url. Higher-level
//! operations build on `load_resource`: retry with backoff, bounded parallel
//! batches, priority tiers and a name barrier.

mod barrier;
mod bounded;
mod guard;
mod resource;
mod retry;
mod state;
mod tiers;


use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use crate::config::LoaderConfig;
use crate::descriptor::LoadRecord;
use crate::environment::{Capabilities, CapabilityRegistry, ResourceInjector};
use crate::retry::RetryPolicy;

pub use state::LoadingStatus;
pub use tiers::{PrioritizedLoad, TierHandle, TierOutcome};

use state::LoaderState;

struct Inner<I> {
    injector: I,
    capabilities: Arc<dyn CapabilityRegistry>,
    config: LoaderConfig,
    policy: RetryPolicy,
    state: Mutex<LoaderState>,
    shutdown: watch::Sender<bool>,
}

/// Resource loader. Cheap to clone; clones share the same cache and in-flight table.
pub struct ScriptLoader<I> {
    inner: Arc<Inner<I>>,
}

impl<I> Clone for ScriptLoader<I> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I: ResourceInjector> ScriptLoader<I> {
    /// Loader with no pre-declared capabilities.
    pub fn new(injector: I, config: LoaderConfig) -> Self {
        Self::with_capabilities(injector, config, Arc::new(Capabilities::new()))
    }

    /// Loader that consults `capabilities` before injecting a resource and while
    /// waiting on names.
    pub fn with_capabilities(
        injector: I,
        config: LoaderConfig,
        capabilities: Arc<dyn CapabilityRegistry>,
    ) -> Self {
        let policy = config.retry_policy().unwrap_or_else(|err| {
            tracing::warn!(error = %format!("{err:#}"), "invalid retry config, using default backoff");
            RetryPolicy::default()
        });
        let (shutdown, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                injector,
                capabilities,
                config,
                policy,
                state: Mutex::new(LoaderState::default()),
                shutdown,
            }),
        }
    }

    pub fn injector(&self) -> &I {
        &self.inner.injector
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.inner.config
    }

    /// Cached record for `url`, if a load of it completed.
    pub fn cached(&self, url: &str) -> Option<LoadRecord> {
        self.lock_state().cached(url)
    }

    /// Cached `(url, record)` pairs in insertion order.
    pub fn cached_records(&self) -> Vec<(String, LoadRecord)> {
        self.lock_state().cached_records()
    }

    pub fn status(&self) -> LoadingStatus {
        self.lock_state().status()
    }

    /// Forget in-flight loads. The cache and load order are kept; running loads
    /// still settle, but new requests for their urls start a fresh load.
    pub fn cleanup(&self) {
        let cleared = self.lock_state().clear_in_flight();
        tracing::debug!(cleared, "cleared in-flight loads");
    }

    /// Signal shutdown. Tiers that have not started are cancelled when
    /// `cancel_pending_tiers_on_shutdown` is set; otherwise they run as scheduled.
    pub fn shutdown(&self) {
        self.inner.shutdown.send_replace(true);
        tracing::info!(
            cancel_pending = self.inner.config.cancel_pending_tiers_on_shutdown,
            "loader shutdown requested"
        );
    }

    pub fn is_shut_down(&self) -> bool {
        *self.inner.shutdown.borrow()
    }

    fn lock_state(&self) -> MutexGuard<'_, LoaderState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}
