//! Single-resource load: cache fast path, coalescing, timeout.

use std::time::Duration;

use tokio::sync::watch;

use super::guard::InFlightGuard;
use super::state::Settled;
use super::ScriptLoader;
use crate::descriptor::{LoadRecord, ResourceDescriptor};
use crate::environment::ResourceInjector;
use crate::error::LoadError;

enum Role {
    Leader {
        generation: u64,
        tx: watch::Sender<Settled>,
    },
    Follower(watch::Receiver<Settled>),
}

impl<I: ResourceInjector> ScriptLoader<I> {
    /// Load one resource, racing the injection against `timeout`.
    ///
    /// A cached url returns immediately; a url already in flight attaches to
    /// the running load. Never retries.
    pub async fn load_resource(
        &self,
        resource: &ResourceDescriptor,
        timeout: Duration,
    ) -> Result<LoadRecord, LoadError> {
        let role = {
            let mut state = self.lock_state();
            if let Some(record) = state.cached(&resource.url) {
                return Ok(record);
            }
            if let Some(rx) = state.waiter(&resource.url) {
                Role::Follower(rx)
            } else if self.inner.capabilities.is_present(&resource.name) {
                tracing::debug!(name = %resource.name, "capability already present, skipping load");
                let record = LoadRecord {
                    name: resource.name.clone(),
                    success: true,
                };
                state.record_present(&resource.url, record.clone());
                return Ok(record);
            } else {
                let (generation, tx) = state.begin(&resource.url);
                Role::Leader { generation, tx }
            }
        };

        match role {
            Role::Follower(rx) => {
                tracing::debug!(name = %resource.name, url = %resource.url, "joining in-flight load");
                wait_settled(rx, resource).await
            }
            Role::Leader { generation, tx } => {
                let _guard = InFlightGuard {
                    state: &self.inner.state,
                    url: &resource.url,
                    generation,
                };
                tracing::debug!(name = %resource.name, url = %resource.url, "loading resource");
                let result = self.inject_with_timeout(resource, generation, timeout).await;
                tx.send_replace(Some(result.clone()));
                result
            }
        }
    }

    async fn inject_with_timeout(
        &self,
        resource: &ResourceDescriptor,
        generation: u64,
        timeout: Duration,
    ) -> Result<LoadRecord, LoadError> {
        match tokio::time::timeout(timeout, self.inner.injector.inject(resource)).await {
            Ok(Ok(())) => {
                let record = LoadRecord {
                    name: resource.name.clone(),
                    success: true,
                };
                self.lock_state()
                    .complete(&resource.url, generation, record.clone());
                tracing::debug!(name = %resource.name, "resource loaded");
                Ok(record)
            }
            Ok(Err(e)) => {
                tracing::debug!(name = %resource.name, "resource failed: {}", e);
                Err(LoadError::Failed {
                    name: resource.name.clone(),
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                tracing::debug!(name = %resource.name, timeout_ms = timeout.as_millis() as u64, "resource timed out");
                Err(LoadError::Timeout {
                    name: resource.name.clone(),
                    timeout,
                })
            }
        }
    }
}

/// Wait for the leading load to publish its result.
async fn wait_settled(
    mut rx: watch::Receiver<Settled>,
    resource: &ResourceDescriptor,
) -> Result<LoadRecord, LoadError> {
    let settled = rx.wait_for(Option::is_some).await.ok().and_then(|v| v.clone());
    settled.unwrap_or_else(|| {
        Err(LoadError::Failed {
            name: resource.name.clone(),
            reason: "load abandoned before it settled".to_string(),
        })
    })
}
