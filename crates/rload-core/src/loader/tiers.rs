//! Priority-tiered loading.
//!
//! The high tier loads immediately. Medium and low tiers are scheduled tasks
//! that start after fixed delays measured from the call; each gets a
//! `TierHandle` that can cancel it before it starts or await its outcome.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::ScriptLoader;
use crate::descriptor::{LoadOutcome, Priority, ResourceDescriptor};
use crate::environment::ResourceInjector;
use crate::error::LoadError;

const PENDING: u8 = 0;
const STARTED: u8 = 1;
const CANCELLED: u8 = 2;

/// Final state of a scheduled tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierOutcome {
    /// No descriptors had this priority.
    Empty,
    /// Cancelled (explicitly or by shutdown) before it started.
    Cancelled,
    Completed(Vec<LoadOutcome>),
    /// A required resource in the tier exhausted its retries.
    Failed(LoadError),
}

/// Handle to a scheduled medium or low tier. Dropping it does not cancel the tier.
#[derive(Debug)]
pub struct TierHandle {
    priority: Priority,
    phase: Arc<AtomicU8>,
    cancel_tx: watch::Sender<bool>,
    task: Option<JoinHandle<TierOutcome>>,
}

impl TierHandle {
    fn empty(priority: Priority) -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self {
            priority,
            phase: Arc::new(AtomicU8::new(STARTED)),
            cancel_tx,
            task: None,
        }
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// True once the tier's loads have begun.
    pub fn is_started(&self) -> bool {
        self.task.is_some() && self.phase.load(Ordering::Acquire) == STARTED
    }

    /// Cancel the tier if it has not started yet. Returns whether it was cancelled.
    pub fn cancel(&self) -> bool {
        if self.task.is_none() {
            return false;
        }
        let cancelled = self
            .phase
            .compare_exchange(PENDING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if cancelled {
            self.cancel_tx.send_replace(true);
            tracing::debug!(priority = ?self.priority, "tier cancelled");
        }
        cancelled
    }

    /// Wait for the tier to finish.
    pub async fn join(self) -> TierOutcome {
        let Some(task) = self.task else {
            return TierOutcome::Empty;
        };
        match task.await {
            Ok(outcome) => outcome,
            Err(e) => match e.try_into_panic() {
                Ok(panic) => std::panic::resume_unwind(panic),
                Err(_) => TierOutcome::Cancelled,
            },
        }
    }
}

/// Result of `load_prioritized`: the awaited high tier plus handles to the scheduled ones.
#[derive(Debug)]
pub struct PrioritizedLoad {
    pub high: Result<Vec<LoadOutcome>, LoadError>,
    pub medium: TierHandle,
    pub low: TierHandle,
}

impl<I: ResourceInjector> ScriptLoader<I> {
    /// Load high-priority resources now; schedule medium and low tiers after
    /// the configured delays. Tiers do not block each other.
    pub async fn load_prioritized(&self, resources: &[ResourceDescriptor]) -> PrioritizedLoad {
        let start = Instant::now();
        let tier = |p: Priority| -> Vec<ResourceDescriptor> {
            resources
                .iter()
                .filter(|r| r.priority == p)
                .cloned()
                .collect()
        };
        let (high, medium, low) = (tier(Priority::High), tier(Priority::Medium), tier(Priority::Low));
        tracing::debug!(
            high = high.len(),
            medium = medium.len(),
            low = low.len(),
            "prioritized load"
        );

        let config = &self.inner.config;
        let medium = self.schedule_tier(Priority::Medium, medium, start + config.medium_delay());
        let low = self.schedule_tier(Priority::Low, low, start + config.low_delay());
        let high = self.load_many_bounded(&high, config.max_concurrent).await;

        PrioritizedLoad { high, medium, low }
    }

    fn schedule_tier(
        &self,
        priority: Priority,
        resources: Vec<ResourceDescriptor>,
        at: Instant,
    ) -> TierHandle {
        if resources.is_empty() {
            return TierHandle::empty(priority);
        }
        let phase = Arc::new(AtomicU8::new(PENDING));
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let mut shutdown_rx = self.inner.shutdown.subscribe();
        let cancel_on_shutdown = self.inner.config.cancel_pending_tiers_on_shutdown;
        let max_concurrent = self.inner.config.max_concurrent;
        let loader = self.clone();
        let task_phase = Arc::clone(&phase);

        let task = tokio::spawn(async move {
            let cancelled = async { cancel_rx.wait_for(|c| *c).await.is_ok() };
            let shut_down = async { shutdown_rx.wait_for(|s| *s).await.is_ok() };
            tokio::select! {
                _ = tokio::time::sleep_until(at) => {}
                true = cancelled => return TierOutcome::Cancelled,
                true = shut_down, if cancel_on_shutdown => {
                    task_phase.store(CANCELLED, Ordering::Release);
                    tracing::debug!(priority = ?priority, "tier cancelled by shutdown");
                    return TierOutcome::Cancelled;
                }
            }
            if task_phase
                .compare_exchange(PENDING, STARTED, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                return TierOutcome::Cancelled;
            }
            tracing::debug!(priority = ?priority, count = resources.len(), "tier started");
            match loader.load_many_bounded(&resources, max_concurrent).await {
                Ok(outcomes) => TierOutcome::Completed(outcomes),
                Err(e) => TierOutcome::Failed(e),
            }
        });

        TierHandle {
            priority,
            phase,
            cancel_tx,
            task: Some(task),
        }
    }
}
