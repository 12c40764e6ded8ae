//! Dashboard broadcast configuration.

use serde::{Deserialize, Serialize};

/// Broadcast hub configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Per-observer buffer; events beyond it are dropped for that observer.
    #[serde(default = "default_buffer")]
    pub observer_buffer_size: usize,
    /// SSE keep-alive interval in seconds.
    #[serde(default = "default_keep_alive")]
    pub keep_alive_seconds: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            observer_buffer_size: default_buffer(),
            keep_alive_seconds: default_keep_alive(),
        }
    }
}

fn default_buffer() -> usize {
    64
}

fn default_keep_alive() -> u64 {
    15
}
