//! # slotbot-realtime
//!
//! Best-effort fan-out of [`HubEvent`](slotbot_core::events::HubEvent)s to
//! any number of live observers. Each observer owns a bounded buffer; a slow
//! observer loses events instead of slowing the publisher down.

pub mod hub;
pub mod observer;

pub use hub::{BroadcastHub, PublishReport};
pub use observer::{ObserverId, ObserverStream};
