//! Slot query filter.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::Slot;
use super::status::StatusFilter;

/// Conjunction of optional predicates over slots. Results are ordered by
/// admission time ascending.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotFilter {
    /// Restrict to one session.
    pub session_id: Option<Uuid>,
    /// Restrict to one caller.
    pub user: Option<String>,
    /// Restrict by status.
    pub status: Option<StatusFilter>,
    /// Exact text match.
    pub message: Option<String>,
    /// Admission time at or after.
    pub time_from: Option<DateTime<Utc>>,
    /// Admission time at or before.
    pub time_to: Option<DateTime<Utc>>,
    /// Local date at or after.
    pub date_from: Option<NaiveDate>,
    /// Local date at or before.
    pub date_to: Option<NaiveDate>,
}

impl SlotFilter {
    /// Slots of one user within one session.
    pub fn for_user_in_session(session_id: Uuid, user: &str) -> Self {
        Self {
            session_id: Some(session_id),
            user: Some(user.to_string()),
            ..Default::default()
        }
    }

    /// IN slots admitted in `[from, to]`.
    pub fn played_between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            status: Some(StatusFilter::In),
            time_from: Some(from),
            time_to: Some(to),
            ..Default::default()
        }
    }

    /// Evaluate the filter against one slot.
    pub fn matches(&self, slot: &Slot) -> bool {
        self.session_id.is_none_or(|id| slot.session_id == id)
            && self.user.as_deref().is_none_or(|u| slot.user == u)
            && self.status.is_none_or(|s| s.matches(slot.status))
            && self.message.as_deref().is_none_or(|m| slot.message == m)
            && self.time_from.is_none_or(|t| slot.time >= t)
            && self.time_to.is_none_or(|t| slot.time <= t)
            && self.date_from.is_none_or(|d| slot.local_date >= d)
            && self.date_to.is_none_or(|d| slot.local_date <= d)
    }
}
