//! Retried load with the required/optional exhaustion policy.

use std::time::Duration;

use super::ScriptLoader;
use crate::descriptor::{LoadOutcome, ResourceDescriptor};
use crate::environment::ResourceInjector;
use crate::error::LoadError;
use crate::retry::run_with_retry;

impl<I: ResourceInjector> ScriptLoader<I> {
    /// Up to `max_retries + 1` attempts of `load_resource`, backing off between them.
    ///
    /// When attempts run out, a required resource fails with `RetryExhausted`;
    /// an optional one resolves with `success: false` and the last error.
    pub async fn load_with_retry(
        &self,
        resource: &ResourceDescriptor,
        max_retries: u32,
        timeout: Duration,
    ) -> Result<LoadOutcome, LoadError> {
        let policy = self.inner.policy;
        let result = run_with_retry(&policy, max_retries, |_| {
            self.load_resource(resource, timeout)
        })
        .await;

        match result {
            Ok(record) => Ok(record.into()),
            Err(failure) if resource.required => {
                tracing::error!(
                    name = %resource.name,
                    attempts = failure.attempts,
                    "required resource failed: {}",
                    failure.last
                );
                Err(LoadError::RetryExhausted {
                    name: resource.name.clone(),
                    attempts: failure.attempts,
                    last: Box::new(failure.last),
                })
            }
            Err(failure) => {
                tracing::warn!(
                    name = %resource.name,
                    attempts = failure.attempts,
                    "optional resource skipped: {}",
                    failure.last
                );
                Ok(LoadOutcome {
                    name: resource.name.clone(),
                    success: false,
                    error: Some(failure.last.to_string()),
                })
            }
        }
    }
}
