//! Configuration for the answering service.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default bound on each external call, in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Configuration for the answering service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerConfig {
    /// Timeout applied to each embedder and completion call, in milliseconds.
    pub request_timeout_ms: u64,
}

impl AnswerConfig {
    /// Set the per-call timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_timeout() {
        assert_eq!(AnswerConfig::default().request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_timeout_round_trips_through_millis() {
        let config = AnswerConfig::default().with_request_timeout(Duration::from_millis(250));
        assert_eq!(config.request_timeout_ms, 250);
        assert_eq!(config.request_timeout(), Duration::from_millis(250));
    }
}
