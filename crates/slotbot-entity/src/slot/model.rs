//! Slot entity model.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::SlotStatus;
use crate::chat::Badges;

/// One user's call, queued within a session.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Slot {
    /// Unique slot identifier.
    pub id: Uuid,
    /// Session the slot was admitted into.
    pub session_id: Uuid,
    /// Admission instant.
    pub time: DateTime<Utc>,
    /// Admission date in the reference time zone.
    pub local_date: NaiveDate,
    /// Chat username of the caller.
    #[sqlx(rename = "user_name")]
    pub user: String,
    /// The called text.
    pub message: String,
    /// Caller held a subscriber badge.
    pub subscriber: bool,
    /// Caller held a VIP badge.
    pub vip: bool,
    /// Caller held a moderator badge.
    pub moderator: bool,
    /// Operator-assigned outcome; `None` while queued.
    pub status: Option<SlotStatus>,
    /// Recorded payout.
    pub payout: Option<f64>,
    /// Number of transitions to OUT.
    pub out_count: i32,
    /// Last status change.
    pub status_changed_at: Option<DateTime<Utc>>,
    /// Until when the same text is refused after an OUT.
    pub cooldown_expires_at: Option<DateTime<Utc>>,
}

impl Slot {
    /// Remaining cooldown at `now`, if the slot is OUT and still cooling down.
    pub fn cooldown_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.status != Some(SlotStatus::Out) {
            return None;
        }
        self.cooldown_expires_at
            .filter(|expires| *expires > now)
            .map(|expires| expires - now)
    }

    /// Whether the slot's text may be called again at `now`.
    pub fn is_recallable(&self, now: DateTime<Utc>) -> bool {
        self.status == Some(SlotStatus::Out) && self.cooldown_remaining(now).is_none()
    }

    /// Apply an update in place.
    pub fn apply(&mut self, patch: &SlotPatch) {
        if let Some(status) = patch.status {
            self.status = Some(status);
        }
        if let Some(payout) = patch.payout {
            self.payout = Some(payout);
        }
        if let Some(message) = &patch.message {
            self.message = message.clone();
        }
        if let Some(changed) = patch.status_changed_at {
            self.status_changed_at = Some(changed);
        }
        self.cooldown_expires_at = patch.cooldown_expires_at;
        if patch.increment_out_count {
            self.out_count += 1;
        }
    }
}

/// Data required to admit a new slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSlot {
    /// Target session.
    pub session_id: Uuid,
    /// Admission instant.
    pub time: DateTime<Utc>,
    /// Admission date in the reference time zone.
    pub local_date: NaiveDate,
    /// Caller.
    pub user: String,
    /// Called text.
    pub message: String,
    /// Caller badges at admission.
    pub badges: Badges,
}

impl NewSlot {
    /// Materialize with a fresh ID, unset status and zero OUT count.
    pub fn into_slot(self, id: Uuid) -> Slot {
        Slot {
            id,
            session_id: self.session_id,
            time: self.time,
            local_date: self.local_date,
            user: self.user,
            message: self.message,
            subscriber: self.badges.subscriber,
            vip: self.badges.vip,
            moderator: self.badges.moderator,
            status: None,
            payout: None,
            out_count: 0,
            status_changed_at: None,
            cooldown_expires_at: None,
        }
    }
}

/// A resolved operator update.
///
/// `cooldown_expires_at` is always written: a transition to OUT sets it,
/// every other update clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotPatch {
    /// New status.
    pub status: Option<SlotStatus>,
    /// New payout.
    pub payout: Option<f64>,
    /// New text.
    pub message: Option<String>,
    /// Stamp for a status change.
    pub status_changed_at: Option<DateTime<Utc>>,
    /// Cooldown value to store.
    pub cooldown_expires_at: Option<DateTime<Utc>>,
    /// Bump `out_count` by one.
    pub increment_out_count: bool,
}
