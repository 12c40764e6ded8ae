//! Session rollover configuration.

use serde::{Deserialize, Serialize};

/// Session lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle minutes after which the next command opens a new session.
    #[serde(default = "default_inactivity")]
    pub inactivity_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_minutes: default_inactivity(),
        }
    }
}

fn default_inactivity() -> u64 {
    120
}
