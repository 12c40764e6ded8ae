//! Fixed-offset reference time zone used for calendar dates.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

use crate::error::AppError;

/// The time zone in which "today" and `local_date` are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceZone {
    offset: FixedOffset,
}

impl ReferenceZone {
    /// Build from an offset in minutes east of UTC.
    pub fn from_minutes(minutes: i32) -> Result<Self, AppError> {
        FixedOffset::east_opt(minutes * 60)
            .map(|offset| Self { offset })
            .ok_or_else(|| AppError::configuration(format!("Invalid UTC offset: {minutes} minutes")))
    }

    /// UTC.
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Calendar date of `instant` in this zone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// The UTC instant of local midnight on `date`.
    pub fn midnight(&self, date: NaiveDate) -> DateTime<Utc> {
        let naive = date.and_time(NaiveTime::MIN);
        match self.offset.from_local_datetime(&naive).single() {
            Some(local) => local.with_timezone(&Utc),
            None => Utc.from_utc_datetime(&naive),
        }
    }
}

impl Default for ReferenceZone {
    fn default() -> Self {
        Self::utc()
    }
}
