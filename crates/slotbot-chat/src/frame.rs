//! Websocket frame decoding.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use slotbot_entity::chat::{Badges, ChatEvent};

/// Protocol event names handled by the feed itself.
pub mod protocol {
    /// Server keep-alive ping.
    pub const PING: &str = "pusher:ping";
    /// Reply to [`PING`].
    pub const PONG: &str = "pusher:pong";
    /// Sent by the server once the socket is ready.
    pub const CONNECTION_ESTABLISHED: &str = "pusher:connection_established";
    /// Subscription request.
    pub const SUBSCRIBE: &str = "pusher:subscribe";
    /// Subscription confirmed.
    pub const SUBSCRIPTION_SUCCEEDED: &str = "pusher_internal:subscription_succeeded";
    /// Server-side error.
    pub const ERROR: &str = "pusher:error";
}

/// Outer envelope of every frame.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    /// Event name, when present.
    #[serde(default)]
    pub event: Option<String>,
    /// Channel the event belongs to.
    #[serde(default)]
    pub channel: Option<String>,
    /// Payload: an object or a JSON-encoded string.
    #[serde(default)]
    pub data: Option<Value>,
}

impl Envelope {
    /// Decode a text frame. Returns `None` for anything that is not JSON.
    pub fn decode(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    /// The payload as an object, unwrapping string-encoded JSON.
    pub fn payload(&self) -> Option<Value> {
        match self.data.as_ref()? {
            Value::String(raw) => serde_json::from_str(raw).ok(),
            Value::Null => None,
            other => Some(other.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessagePayload {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    sender: Option<Sender>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct Sender {
    username: String,
    #[serde(default)]
    identity: Option<Identity>,
}

#[derive(Debug, Default, Deserialize)]
struct Identity {
    #[serde(default)]
    badges: Vec<Badge>,
}

#[derive(Debug, Deserialize)]
struct Badge {
    #[serde(rename = "type")]
    kind: String,
}

/// Extract a chat message from a text frame.
///
/// Frames without `data`, without a sender, or with blank content yield
/// `None`. A missing `created_at` is replaced with `received_at`.
pub fn parse_frame(text: &str, received_at: DateTime<Utc>) -> Option<ChatEvent> {
    let payload = Envelope::decode(text)?.payload()?;
    let message: MessagePayload = serde_json::from_value(payload).ok()?;

    let content = message.content?.trim().to_string();
    if content.is_empty() {
        return None;
    }
    let sender = message.sender?;
    let badges = sender
        .identity
        .map(|identity| Badges::from_types(identity.badges.iter().map(|b| b.kind.as_str())))
        .unwrap_or_default();

    Some(ChatEvent {
        user: sender.username,
        content,
        badges,
        timestamp: message.created_at.unwrap_or(received_at),
    })
}
