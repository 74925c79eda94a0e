//! Retry loop: run an async attempt until success or retries run out.

use std::future::Future;

use super::policy::{RetryDecision, RetryPolicy};
use crate::error::LoadError;

/// Last error of an exhausted retry loop, with the number of attempts made.
#[derive(Debug, Clone)]
pub struct RetryFailure {
    pub attempts: u32,
    pub last: LoadError,
}

/// Runs `attempt_fn(attempt)` until it succeeds or `max_retries` retries have failed.
/// On failure, sleeps for the backoff duration then tries again.
pub async fn run_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    max_retries: u32,
    mut attempt_fn: F,
) -> Result<T, RetryFailure>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, LoadError>>,
{
    let mut attempt = 0u32;
    loop {
        match attempt_fn(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => match policy.decide(attempt, max_retries) {
                RetryDecision::NoRetry => {
                    return Err(RetryFailure {
                        attempts: attempt + 1,
                        last: e,
                    })
                }
                RetryDecision::RetryAfter(d) => {
                    tracing::warn!(attempt, delay_ms = d.as_millis() as u64, "retrying: {}", e);
                    tokio::time::sleep(d).await;
                    attempt += 1;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    fn failed() -> LoadError {
        LoadError::Failed {
            name: "x".into(),
            reason: "boom".into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();
        let start = Instant::now();
        let out = run_with_retry(&policy, 3, |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(failed())
                } else {
                    Ok(attempt)
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(out, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 1s + 2s of backoff.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_millis(3100));
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_reports_attempts_and_last_error() {
        let policy = RetryPolicy::default();
        let err = run_with_retry(&policy, 2, |_| async { Err::<(), _>(failed()) })
            .await
            .unwrap_err();
        assert_eq!(err.attempts, 3);
        assert_eq!(err.last, failed());
    }
}
