//! Session entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A time-bounded grouping of slots.
///
/// A session is "current" while it is the most recently active one and has
/// not been idle longer than the configured threshold. Sessions are never
/// deleted; only `last_activity` changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// When the session was opened.
    pub start_time: DateTime<Utc>,
    /// Last accepted slot-producing command.
    pub last_activity: DateTime<Utc>,
    /// Human-readable creation time, `YYYY-MM-DD HH:MM` (UTC).
    pub label: String,
}

impl Session {
    /// Render the label for a session created at `start`.
    pub fn label_for(start: DateTime<Utc>) -> String {
        start.format("%Y-%m-%d %H:%M").to_string()
    }

    /// How long the session has been idle at `now`.
    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        now - self.last_activity
    }

    /// Whether the session has been idle longer than `threshold`.
    pub fn is_stale(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        self.idle_for(now) > threshold
    }
}

/// Data required to open a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
    /// Creation instant; also the initial `last_activity`.
    pub start_time: DateTime<Utc>,
    /// Human-readable label.
    pub label: String,
}

impl NewSession {
    /// Session opened at `start`.
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            start_time: start,
            label: Session::label_for(start),
        }
    }
}
