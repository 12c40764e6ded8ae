//! Outbound reply serialization for SlotBot.
//!
//! This crate provides:
//! - A FIFO reply queue in which each inbound command reserves its position
//!   on arrival ([`ReplyTicket`])
//! - A single runner that awaits each reserved reply in turn and hands it to
//!   the [`OutboundChannel`](slotbot_core::traits::OutboundChannel), never
//!   overlapping two sends

pub mod queue;
pub mod runner;

pub use queue::{QueuedReply, ReplyQueue, ReplyTicket};
pub use runner::{DeliveryOutcome, ReplyRunner, ReplyStats, ReplyStatsSnapshot};
