use std::time::Duration;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Stop; retries are used up.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff policy, optionally capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
    /// Upper bound on backoff delay; `None` leaves the doubling uncapped.
    pub max_delay: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            max_delay: None,
        }
    }
}

impl RetryPolicy {
    /// Backoff after 0-based `attempt` failed: `base * 2^attempt`, saturating,
    /// then capped at `max_delay` when one is set.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let raw = 2u32
            .checked_pow(attempt)
            .map(|factor| self.base_delay.saturating_mul(factor))
            .unwrap_or(Duration::MAX);
        match self.max_delay {
            Some(cap) => raw.min(cap),
            None => raw,
        }
    }

    /// Decide what to do after 0-based `attempt` failed, given `max_retries`
    /// retries on top of the first attempt.
    pub fn decide(&self, attempt: u32, max_retries: u32) -> RetryDecision {
        if attempt >= max_retries {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.delay_for(attempt))
    }
}
