//! Inbound chat event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Badge flags relevant to admission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badges {
    /// Subscriber badge.
    pub subscriber: bool,
    /// VIP badge.
    pub vip: bool,
    /// Moderator badge.
    pub moderator: bool,
}

impl Badges {
    /// Collect flags from badge type names; unknown types are ignored.
    pub fn from_types<'a>(types: impl IntoIterator<Item = &'a str>) -> Self {
        let mut badges = Self::default();
        for kind in types {
            match kind {
                "subscriber" => badges.subscriber = true,
                "vip" => badges.vip = true,
                "moderator" => badges.moderator = true,
                _ => {}
            }
        }
        badges
    }
}

/// One chat message from the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEvent {
    /// Sender username.
    pub user: String,
    /// Raw message text.
    pub content: String,
    /// Sender badges.
    pub badges: Badges,
    /// When the message was sent (or received, if the frame has no stamp).
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badges_from_types() {
        let badges = Badges::from_types(["subscriber", "og", "moderator"]);
        assert!(badges.subscriber);
        assert!(!badges.vip);
        assert!(badges.moderator);
    }
}
