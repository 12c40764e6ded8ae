//! # slotbot-chat
//!
//! Adapters between SlotBot and the chat platform:
//! - [`PusherFeed`]: websocket client turning feed frames into [`ChatEvent`](slotbot_entity::chat::ChatEvent)s
//! - [`HttpReplyChannel`] / [`LogReplyChannel`]: outbound reply delivery
//! - [`WebhookNotifier`]: best-effort slot announcements

pub mod feed;
pub mod frame;
pub mod notify;
pub mod outbound;

pub use feed::{Backoff, PusherFeed};
pub use frame::parse_frame;
pub use notify::{NoopNotifier, WebhookNotifier, notifier_from_config};
pub use outbound::{HttpReplyChannel, LogReplyChannel, outbound_from_config};
