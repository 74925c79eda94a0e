//! Name barrier: wait until named resources announced completion.

use std::time::Duration;

use tokio::time::Instant;

use super::ScriptLoader;
use crate::environment::ResourceInjector;
use crate::error::LoadError;

impl<I: ResourceInjector> ScriptLoader<I> {
    /// Poll until every name is in the load order or present in the capability
    /// registry. Fails with `WaitTimeout` listing the missing names.
    ///
    /// Only proves a load completed, not that whatever it provides is ready.
    pub async fn wait_for_names<S: AsRef<str> + Sync>(
        &self,
        names: &[S],
        timeout: Duration,
    ) -> Result<bool, LoadError> {
        let deadline = Instant::now() + timeout;
        let interval = self.inner.config.poll_interval();
        loop {
            let missing = self.missing_names(names);
            if missing.is_empty() {
                return Ok(true);
            }
            let now = Instant::now();
            if now >= deadline {
                tracing::warn!(?missing, "wait for names timed out");
                return Err(LoadError::WaitTimeout { missing });
            }
            tokio::time::sleep(interval.min(deadline - now)).await;
        }
    }

    fn missing_names<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        let state = self.lock_state();
        names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !state.has_completed(name) && !self.inner.capabilities.is_present(name))
            .map(str::to_string)
            .collect()
    }
}
