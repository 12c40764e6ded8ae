//! Change events republished to dashboard observers.
//!
//! Each event carries a wire name (`slot`, `update`, ...) and a JSON payload.
//! Payload shapes are owned by the publisher; observers treat them as opaque.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event names understood by dashboard clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A slot was admitted.
    #[serde(rename = "slot")]
    Slot,
    /// A slot was edited by an operator.
    #[serde(rename = "update")]
    Update,
    /// A slot was deleted.
    #[serde(rename = "delete")]
    Delete,
    /// Settings were replaced.
    #[serde(rename = "settings")]
    Settings,
    /// A user was timed out.
    #[serde(rename = "timeoutAdd")]
    TimeoutAdd,
    /// A timeout was lifted.
    #[serde(rename = "timeoutRemove")]
    TimeoutRemove,
}

impl EventKind {
    /// Wire name of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slot => "slot",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Settings => "settings",
            Self::TimeoutAdd => "timeoutAdd",
            Self::TimeoutRemove => "timeoutRemove",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change event with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event was created.
    pub timestamp: DateTime<Utc>,
    /// Event name.
    pub kind: EventKind,
    /// Event body.
    pub payload: serde_json::Value,
}

impl HubEvent {
    /// Create a new event stamped with the current time.
    pub fn new(kind: EventKind, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            kind,
            payload,
        }
    }

    /// Create an event from any serializable payload.
    pub fn from_payload<T: Serialize>(kind: EventKind, payload: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(kind, serde_json::to_value(payload)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names_match_serde() {
        for kind in [
            EventKind::Slot,
            EventKind::Update,
            EventKind::Delete,
            EventKind::Settings,
            EventKind::TimeoutAdd,
            EventKind::TimeoutRemove,
        ] {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.as_str().to_string()));
        }
    }

    #[test]
    fn test_from_payload() {
        let event =
            HubEvent::from_payload(EventKind::Delete, &serde_json::json!({ "id": "abc" })).unwrap();
        assert_eq!(event.kind, EventKind::Delete);
        assert_eq!(event.payload["id"], "abc");
    }
}
