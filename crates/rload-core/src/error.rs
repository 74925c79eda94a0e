//! Loader error taxonomy.

use std::time::Duration;

/// Error surfaced by loader operations.
///
/// `Timeout` and `Failed` describe one attempt and are retried by
/// `load_with_retry`; `RetryExhausted` is terminal for required resources.
/// Cloneable so a coalesced load can hand the same result to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("resource '{name}' did not load within {}ms", .timeout.as_millis())]
    Timeout { name: String, timeout: Duration },

    #[error("resource '{name}' failed to load: {reason}")]
    Failed { name: String, reason: String },

    #[error("resource '{name}' failed after {attempts} attempt(s): {last}")]
    RetryExhausted {
        name: String,
        attempts: u32,
        last: Box<LoadError>,
    },

    #[error("timed out waiting for: {}", .missing.join(", "))]
    WaitTimeout { missing: Vec<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_resource() {
        let e = LoadError::Timeout {
            name: "charts".into(),
            timeout: Duration::from_millis(250),
        };
        assert_eq!(e.to_string(), "resource 'charts' did not load within 250ms");

        let e = LoadError::RetryExhausted {
            name: "charts".into(),
            attempts: 3,
            last: Box::new(LoadError::Failed {
                name: "charts".into(),
                reason: "HTTP 404".into(),
            }),
        };
        assert!(e.to_string().starts_with("resource 'charts' failed after 3 attempt(s)"));
    }

    #[test]
    fn wait_timeout_lists_missing() {
        let e = LoadError::WaitTimeout {
            missing: vec!["B".into(), "C".into()],
        };
        assert_eq!(e.to_string(), "timed out waiting for: B, C");
    }
}
