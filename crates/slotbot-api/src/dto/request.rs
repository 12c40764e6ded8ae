//! Request DTOs with validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use slotbot_core::error::AppError;
use slotbot_core::result::AppResult;
use slotbot_core::types::LeaderboardPeriod;
use slotbot_entity::settings::SettingsPatch;
use slotbot_entity::slot::{SlotFilter, SlotStatus, StatusFilter};
use slotbot_service::SlotUpdate;

/// Query string of `GET /api/slots`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotQuery {
    /// Session to list.
    pub session_id: Option<Uuid>,
    /// `IN`, `OUT` or `unset`.
    pub status: Option<String>,
    /// Exact username.
    pub user: Option<String>,
    /// Inclusive lower `local_date` bound, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Inclusive upper `local_date` bound, `YYYY-MM-DD`.
    pub end_date: Option<String>,
}

impl SlotQuery {
    /// Convert into a store filter.
    pub fn into_filter(self) -> AppResult<SlotFilter> {
        let status = self
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::parse::<StatusFilter>)
            .transpose()?;
        Ok(SlotFilter {
            session_id: self.session_id,
            user: self.user.filter(|u| !u.is_empty()),
            status,
            date_from: parse_date(self.start_date.as_deref())?,
            date_to: parse_date(self.end_date.as_deref())?,
            ..Default::default()
        })
    }
}

fn parse_date(raw: Option<&str>) -> AppResult<Option<NaiveDate>> {
    raw.filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| AppError::validation(format!("Invalid date '{s}', expected YYYY-MM-DD")))
        })
        .transpose()
}

/// Body of `PATCH /api/slots/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateSlotRequest {
    /// `IN` or `OUT`.
    pub status: Option<String>,
    /// A number or a numeric string.
    pub payout: Option<Value>,
    /// Replacement text.
    pub message: Option<String>,
}

impl UpdateSlotRequest {
    /// Check field formats and build the service input.
    pub fn into_update(self) -> AppResult<SlotUpdate> {
        let status = self
            .status
            .map(|s| s.parse::<SlotStatus>().map_err(|_| AppError::validation("Invalid status")))
            .transpose()?;
        let payout = self.payout.map(parse_payout).transpose()?;
        Ok(SlotUpdate {
            status,
            payout,
            message: self.message,
        })
    }
}

fn parse_payout(value: Value) -> AppResult<f64> {
    let amount = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    amount
        .filter(|a| a.is_finite())
        .ok_or_else(|| AppError::validation("Invalid payout amount"))
}

/// Body of `PATCH /api/settings`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    /// Toggle limit enforcement.
    pub enabled: Option<bool>,
    /// Per-session limit for followers.
    #[validate(range(min = 0))]
    pub follower_limit: Option<i32>,
    /// Per-session limit for subscribers.
    #[validate(range(min = 0))]
    pub subscriber_limit: Option<i32>,
    /// Per-session limit for VIPs.
    #[validate(range(min = 0))]
    pub vip_limit: Option<i32>,
    /// Per-session limit for moderators.
    #[validate(range(min = 0))]
    pub moderator_limit: Option<i32>,
    /// Minutes before an OUT slot can be called again.
    #[validate(range(min = 0.0))]
    pub out_cooldown_minutes: Option<f64>,
}

impl From<UpdateSettingsRequest> for SettingsPatch {
    fn from(req: UpdateSettingsRequest) -> Self {
        Self {
            enabled: req.enabled,
            follower_limit: req.follower_limit,
            subscriber_limit: req.subscriber_limit,
            vip_limit: req.vip_limit,
            moderator_limit: req.moderator_limit,
            out_cooldown_minutes: req.out_cooldown_minutes,
        }
    }
}

/// Body of `POST /api/timeouts`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTimeoutRequest {
    /// Username to time out.
    #[validate(length(min = 1, message = "User is required"))]
    pub user: String,
    /// Minutes.
    #[validate(range(exclusive_min = 0.0, message = "Duration must be a positive number of minutes"))]
    pub duration: f64,
}

/// Query string of `GET /api/leaderboard`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaderboardQuery {
    /// `daily` (default), `weekly` or `monthly`.
    pub period: Option<String>,
}

impl LeaderboardQuery {
    /// The requested period.
    pub fn period(&self) -> AppResult<LeaderboardPeriod> {
        match self.period.as_deref() {
            None | Some("") => Ok(LeaderboardPeriod::Daily),
            Some(raw) => raw.parse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slot_query_filter() {
        let query = SlotQuery {
            status: Some("unset".to_string()),
            start_date: Some("2024-05-01".to_string()),
            ..Default::default()
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.status, Some(StatusFilter::Unset));
        assert_eq!(filter.date_from, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(filter.date_to.is_none());

        let bad = SlotQuery {
            end_date: Some("05/01/2024".to_string()),
            ..Default::default()
        };
        assert!(bad.into_filter().is_err());
    }

    #[test]
    fn test_update_slot_parsing() {
        let req: UpdateSlotRequest =
            serde_json::from_value(json!({"status": "OUT", "payout": "12.5"})).unwrap();
        let update = req.into_update().unwrap();
        assert_eq!(update.status, Some(SlotStatus::Out));
        assert_eq!(update.payout, Some(12.5));

        let bad_status: UpdateSlotRequest =
            serde_json::from_value(json!({"status": "MAYBE"})).unwrap();
        assert_eq!(bad_status.into_update().unwrap_err().message, "Invalid status");

        let bad_payout: UpdateSlotRequest =
            serde_json::from_value(json!({"payout": "lots"})).unwrap();
        assert_eq!(
            bad_payout.into_update().unwrap_err().message,
            "Invalid payout amount"
        );
    }

    #[test]
    fn test_timeout_request_validation() {
        let ok = CreateTimeoutRequest {
            user: "spammer".to_string(),
            duration: 5.0,
        };
        assert!(ok.validate().is_ok());
        let zero = CreateTimeoutRequest {
            user: "spammer".to_string(),
            duration: 0.0,
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_leaderboard_period_default() {
        assert_eq!(
            LeaderboardQuery::default().period().unwrap(),
            LeaderboardPeriod::Daily
        );
        let weekly = LeaderboardQuery {
            period: Some("weekly".to_string()),
        };
        assert_eq!(weekly.period().unwrap(), LeaderboardPeriod::Weekly);
        let bad = LeaderboardQuery {
            period: Some("yearly".to_string()),
        };
        assert!(bad.period().is_err());
    }
}
