//! Caller privilege tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chat::Badges;

/// Privilege classification of a caller.
///
/// Tiers are ordered by privilege level: Moderator > Vip > Subscriber > Follower.
/// Only the highest tier's limit applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// No badges.
    Follower,
    /// Subscriber badge.
    Subscriber,
    /// VIP badge.
    Vip,
    /// Moderator badge.
    Moderator,
}

impl Tier {
    /// Highest tier granted by a set of badges.
    pub fn from_badges(badges: &Badges) -> Self {
        if badges.moderator {
            Self::Moderator
        } else if badges.vip {
            Self::Vip
        } else if badges.subscriber {
            Self::Subscriber
        } else {
            Self::Follower
        }
    }

    /// Return the tier as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follower => "follower",
            Self::Subscriber => "subscriber",
            Self::Vip => "vip",
            Self::Moderator => "moderator",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
