//! Chat-side value objects: inbound events and parsed commands.

pub mod command;
pub mod event;

pub use command::ChatCommand;
pub use event::{Badges, ChatEvent};
