//! Slot status enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use slotbot_core::AppError;

/// Operator-assigned outcome of a slot. An unset status is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "slot_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum SlotStatus {
    /// The slot was played.
    In,
    /// The slot was skipped; its text enters cooldown.
    Out,
}

impl SlotStatus {
    /// Return the status as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SlotStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN" => Ok(Self::In),
            "OUT" => Ok(Self::Out),
            other => Err(AppError::validation(format!(
                "Invalid status '{other}', expected IN or OUT"
            ))),
        }
    }
}

/// Status selector for queries, including "no status yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusFilter {
    /// Status is IN.
    #[serde(rename = "IN")]
    In,
    /// Status is OUT.
    #[serde(rename = "OUT")]
    Out,
    /// Status has not been set.
    #[serde(rename = "unset")]
    Unset,
}

impl StatusFilter {
    /// Whether `status` satisfies this selector.
    pub fn matches(&self, status: Option<SlotStatus>) -> bool {
        match self {
            Self::In => status == Some(SlotStatus::In),
            Self::Out => status == Some(SlotStatus::Out),
            Self::Unset => status.is_none(),
        }
    }

    /// The concrete status, if any.
    pub fn as_status(&self) -> Option<SlotStatus> {
        match self {
            Self::In => Some(SlotStatus::In),
            Self::Out => Some(SlotStatus::Out),
            Self::Unset => None,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN" => Ok(Self::In),
            "OUT" => Ok(Self::Out),
            "unset" | "UNSET" | "none" => Ok(Self::Unset),
            other => Err(AppError::validation(format!(
                "Invalid status filter '{other}', expected IN, OUT or unset"
            ))),
        }
    }
}
