//! Reply serializer configuration.

use serde::{Deserialize, Serialize};

/// Outbound reply queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyConfig {
    /// Maximum number of reserved-but-unsent replies.
    #[serde(default = "default_capacity")]
    pub queue_capacity: usize,
    /// How long the queue waits for an admission decision.
    #[serde(default = "default_decision_timeout")]
    pub decision_timeout_ms: u64,
    /// Upper bound for one outbound send.
    #[serde(default = "default_send_timeout")]
    pub send_timeout_ms: u64,
    /// Minimum spacing between two sends.
    #[serde(default)]
    pub min_interval_ms: u64,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_capacity(),
            decision_timeout_ms: default_decision_timeout(),
            send_timeout_ms: default_send_timeout(),
            min_interval_ms: 0,
        }
    }
}

fn default_capacity() -> usize {
    256
}

fn default_decision_timeout() -> u64 {
    15_000
}

fn default_send_timeout() -> u64 {
    10_000
}
