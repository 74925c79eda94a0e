//! Bounded parallel batch load.
//!
//! Keeps up to `max_concurrent` retried loads running at once; when one
//! settles, the next queued descriptor is admitted until the queue is empty.

use tokio::task::JoinSet;

use super::ScriptLoader;
use crate::descriptor::{LoadOutcome, ResourceDescriptor};
use crate::environment::ResourceInjector;
use crate::error::LoadError;

impl<I: ResourceInjector> ScriptLoader<I> {
    /// Load `resources` with at most `max_concurrent` in flight; results follow input order.
    ///
    /// Retries and per-attempt timeout come from the loader config. If a required
    /// resource exhausts its retries, the first such error is returned once every
    /// admitted load has settled; siblings are never cancelled.
    pub async fn load_many_bounded(
        &self,
        resources: &[ResourceDescriptor],
        max_concurrent: usize,
    ) -> Result<Vec<LoadOutcome>, LoadError> {
        let max_concurrent = max_concurrent.max(1);
        let max_retries = self.inner.config.max_retries;
        let timeout = self.inner.config.default_timeout();

        let mut results: Vec<Option<LoadOutcome>> = vec![None; resources.len()];
        let mut first_error: Option<LoadError> = None;
        let mut queue = resources.iter().cloned().enumerate();
        let mut join_set = JoinSet::new();

        loop {
            while join_set.len() < max_concurrent {
                let Some((index, resource)) = queue.next() else {
                    break;
                };
                let loader = self.clone();
                join_set.spawn(async move {
                    let result = loader
                        .load_with_retry(&resource, max_retries, timeout)
                        .await;
                    (index, result)
                });
            }

            let Some(joined) = join_set.join_next().await else {
                break;
            };
            match joined {
                Ok((index, Ok(outcome))) => results[index] = Some(outcome),
                Ok((_, Err(e))) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
                Err(e) => {
                    if let Ok(panic) = e.try_into_panic() {
                        std::panic::resume_unwind(panic);
                    }
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }
        let outcomes: Vec<LoadOutcome> = results.into_iter().flatten().collect();
        tracing::info!(
            total = outcomes.len(),
            failed = outcomes.iter().filter(|o| !o.success).count(),
            "batch loaded"
        );
        Ok(outcomes)
    }
}
