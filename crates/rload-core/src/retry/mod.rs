//! Retry and backoff policy.
//!
//! Attempts are 0-based: after attempt `k` fails, the loop waits
//! `base_delay * 2^k` (capped only when a cap is configured) before the next
//! one. Whether exhaustion is fatal is decided by the caller, not here.

mod policy;
mod run;

pub use policy::{RetryDecision, RetryPolicy};
pub use run::{run_with_retry, RetryFailure};
