//! Timeout entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A ban on slot commands for one user until `expires_at`.
///
/// Several rows may exist per user; only the latest expiry governs.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Timeout {
    /// Unique timeout identifier.
    pub id: Uuid,
    /// Chat username.
    #[sqlx(rename = "user_name")]
    pub user: String,
    /// End of the timeout.
    pub expires_at: DateTime<Utc>,
    /// When the timeout was issued.
    pub created_at: DateTime<Utc>,
}

impl Timeout {
    /// Whether the timeout still applies at `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Time left at `now`, zero once expired.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }
}

/// Data required to issue a timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTimeout {
    /// Chat username.
    pub user: String,
    /// End of the timeout.
    pub expires_at: DateTime<Utc>,
    /// Issue time.
    pub created_at: DateTime<Utc>,
}
