//! External notification configuration.

use serde::{Deserialize, Serialize};

/// Webhook notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Webhook URL; notifications are disabled when unset.
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_ms: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    5000
}
