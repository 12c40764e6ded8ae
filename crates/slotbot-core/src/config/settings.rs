//! Seed values for the settings singleton.

use serde::{Deserialize, Serialize};

/// Values written to the settings store on first start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSeed {
    /// Whether tier limits are enforced.
    #[serde(default)]
    pub enabled: bool,
    /// Per-session limit for users without badges.
    #[serde(default = "default_follower")]
    pub follower_limit: i32,
    /// Per-session limit for subscribers.
    #[serde(default = "default_subscriber")]
    pub subscriber_limit: i32,
    /// Per-session limit for VIPs.
    #[serde(default = "default_vip")]
    pub vip_limit: i32,
    /// Per-session limit for moderators.
    #[serde(default = "default_moderator")]
    pub moderator_limit: i32,
    /// Minutes before an OUT slot's text may be called again.
    #[serde(default = "default_cooldown")]
    pub out_cooldown_minutes: f64,
}

impl Default for SettingsSeed {
    fn default() -> Self {
        Self {
            enabled: false,
            follower_limit: default_follower(),
            subscriber_limit: default_subscriber(),
            vip_limit: default_vip(),
            moderator_limit: default_moderator(),
            out_cooldown_minutes: default_cooldown(),
        }
    }
}

fn default_follower() -> i32 {
    1
}

fn default_subscriber() -> i32 {
    2
}

fn default_vip() -> i32 {
    3
}

fn default_moderator() -> i32 {
    5
}

fn default_cooldown() -> f64 {
    30.0
}
