//! Leaderboard periods.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Utc};
use serde::{Deserialize, Serialize};

use super::timezone::ReferenceZone;
use crate::error::AppError;

/// Ranking window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardPeriod {
    /// Since local midnight today.
    Daily,
    /// Since local midnight six days ago.
    Weekly,
    /// Since local midnight twenty-nine days ago.
    Monthly,
}

impl LeaderboardPeriod {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    fn days_back(&self) -> u64 {
        match self {
            Self::Daily => 0,
            Self::Weekly => 6,
            Self::Monthly => 29,
        }
    }

    /// Inclusive lower bound of the window ending at `now`.
    pub fn window_start(&self, now: DateTime<Utc>, zone: ReferenceZone) -> DateTime<Utc> {
        let today = zone.local_date(now);
        let first = today
            .checked_sub_days(Days::new(self.days_back()))
            .unwrap_or(today);
        zone.midnight(first)
    }
}

impl fmt::Display for LeaderboardPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaderboardPeriod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(AppError::validation(format!(
                "Unknown leaderboard period: '{other}'"
            ))),
        }
    }
}
