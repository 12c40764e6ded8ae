//! Admission outcomes and their chat replies.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use slotbot_entity::settings::Tier;
use slotbot_entity::slot::Slot;

/// Why a `!slot` was refused. Every variant maps to exactly one reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    /// The caller has an active timeout.
    TimedOut {
        /// Minutes left, rounded up.
        remaining_minutes: i64,
    },
    /// The caller used up their tier's allowance in this session.
    LimitReached {
        /// Tier that applied.
        tier: Tier,
        /// The tier's limit.
        limit: i32,
    },
    /// The same text went OUT recently.
    Cooldown {
        /// Minutes left, rounded up.
        remaining_minutes: i64,
    },
    /// The same text is already queued or played in this session.
    AlreadyCalled,
}

/// Result of running the `!slot` pipeline.
#[derive(Debug, Clone)]
pub enum Decision {
    /// The slot was written.
    Accepted(Slot),
    /// The slot was refused; nothing was written.
    Rejected(Rejection),
}

impl Decision {
    /// Reply text for `user` who called `text`.
    pub fn reply(&self, user: &str, text: &str) -> String {
        match self {
            Self::Accepted(slot) => {
                format!("your slot '{}' has been added to the list {}!", slot.message, slot.user)
            }
            Self::Rejected(Rejection::TimedOut { remaining_minutes }) => format!(
                "{user} you are timed out for another {}.",
                minutes(*remaining_minutes)
            ),
            Self::Rejected(Rejection::LimitReached { limit, .. }) => {
                format!("{user} slot limit of {limit} reached for this session.")
            }
            Self::Rejected(Rejection::Cooldown { remaining_minutes }) => format!(
                "{user} '{text}' is on cooldown for another {}.",
                minutes(*remaining_minutes)
            ),
            Self::Rejected(Rejection::AlreadyCalled) => {
                format!("{user} this slot has already been called.")
            }
        }
    }

    /// Whether a slot was written.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Whole minutes in `remaining`, rounded up.
pub fn ceil_minutes(remaining: Duration) -> i64 {
    let ms = remaining.num_milliseconds().max(0);
    (ms + 59_999) / 60_000
}

fn minutes(n: i64) -> String {
    if n == 1 {
        "1 minute".to_string()
    } else {
        format!("{n} minutes")
    }
}
