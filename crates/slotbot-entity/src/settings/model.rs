//! Settings entity model.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::tier::Tier;
use slotbot_core::config::SettingsSeed;

/// Singleton admission settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Settings {
    /// Whether tier limits are enforced.
    pub enabled: bool,
    /// Per-session limit for users without badges.
    pub follower_limit: i32,
    /// Per-session limit for subscribers.
    pub subscriber_limit: i32,
    /// Per-session limit for VIPs.
    pub vip_limit: i32,
    /// Per-session limit for moderators.
    pub moderator_limit: i32,
    /// Minutes an OUT slot's text stays blocked.
    pub out_cooldown_minutes: f64,
}

impl Settings {
    /// Per-session limit for `tier`.
    pub fn limit_for(&self, tier: Tier) -> i32 {
        match tier {
            Tier::Follower => self.follower_limit,
            Tier::Subscriber => self.subscriber_limit,
            Tier::Vip => self.vip_limit,
            Tier::Moderator => self.moderator_limit,
        }
    }

    /// Cooldown as a duration, millisecond precision.
    pub fn out_cooldown(&self) -> Duration {
        Duration::try_milliseconds((self.out_cooldown_minutes.max(0.0) * 60_000.0).round() as i64)
            .unwrap_or(Duration::MAX)
    }

    /// Return a copy with `patch` applied.
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        Self {
            enabled: patch.enabled.unwrap_or(self.enabled),
            follower_limit: patch.follower_limit.unwrap_or(self.follower_limit),
            subscriber_limit: patch.subscriber_limit.unwrap_or(self.subscriber_limit),
            vip_limit: patch.vip_limit.unwrap_or(self.vip_limit),
            moderator_limit: patch.moderator_limit.unwrap_or(self.moderator_limit),
            out_cooldown_minutes: patch
                .out_cooldown_minutes
                .unwrap_or(self.out_cooldown_minutes),
        }
    }
}

impl From<&SettingsSeed> for Settings {
    fn from(seed: &SettingsSeed) -> Self {
        Self {
            enabled: seed.enabled,
            follower_limit: seed.follower_limit,
            subscriber_limit: seed.subscriber_limit,
            vip_limit: seed.vip_limit,
            moderator_limit: seed.moderator_limit,
            out_cooldown_minutes: seed.out_cooldown_minutes,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&SettingsSeed::default())
    }
}

/// Partial settings update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsPatch {
    /// New enabled flag.
    pub enabled: Option<bool>,
    /// New follower limit.
    pub follower_limit: Option<i32>,
    /// New subscriber limit.
    pub subscriber_limit: Option<i32>,
    /// New VIP limit.
    pub vip_limit: Option<i32>,
    /// New moderator limit.
    pub moderator_limit: Option<i32>,
    /// New cooldown in minutes.
    pub out_cooldown_minutes: Option<f64>,
}

impl SettingsPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.enabled.is_none()
            && self.follower_limit.is_none()
            && self.subscriber_limit.is_none()
            && self.vip_limit.is_none()
            && self.moderator_limit.is_none()
            && self.out_cooldown_minutes.is_none()
    }
}
