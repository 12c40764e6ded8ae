//! Command parsing.

use serde::{Deserialize, Serialize};
use slotbot_core::types::LeaderboardPeriod;

/// A recognised chat command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatCommand {
    /// `!slot <text>`
    Slot {
        /// Trimmed, non-empty slot text.
        text: String,
    },
    /// `!myslots`
    MySlots,
    /// `!daily`, `!weekly`, `!monthly`, `!top <period>`
    Leaderboard(LeaderboardPeriod),
}

impl ChatCommand {
    /// Parse trimmed message content. Returns `None` for anything that is
    /// not a command this service answers.
    pub fn parse(content: &str, prefix: &str) -> Option<Self> {
        let body = content.trim().strip_prefix(prefix)?;
        let (verb, rest) = match body.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (body, ""),
        };
        match verb {
            "slot" if !rest.is_empty() => Some(Self::Slot {
                text: rest.to_string(),
            }),
            "myslots" if rest.is_empty() => Some(Self::MySlots),
            "daily" if rest.is_empty() => Some(Self::Leaderboard(LeaderboardPeriod::Daily)),
            "weekly" if rest.is_empty() => Some(Self::Leaderboard(LeaderboardPeriod::Weekly)),
            "monthly" if rest.is_empty() => Some(Self::Leaderboard(LeaderboardPeriod::Monthly)),
            "top" => rest.parse().ok().map(Self::Leaderboard),
            _ => None,
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Slot { .. } => "slot",
            Self::MySlots => "myslots",
            Self::Leaderboard(_) => "leaderboard",
        }
    }
}
