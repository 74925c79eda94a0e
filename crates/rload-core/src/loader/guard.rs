//! RAII guard that removes an in-flight entry when the load settles or is dropped.

use std::sync::Mutex;

use super::state::LoaderState;

pub(super) struct InFlightGuard<'a> {
    pub(super) state: &'a Mutex<LoaderState>,
    pub(super) url: &'a str,
    pub(super) generation: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .finish(self.url, self.generation);
    }
}
