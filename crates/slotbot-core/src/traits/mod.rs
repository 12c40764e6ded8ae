//! Capability traits defined in `slotbot-core` and implemented by other crates.

pub mod clock;
pub mod notifier;
pub mod outbound;

pub use clock::{Clock, ManualClock, SystemClock};
pub use notifier::Notifier;
pub use outbound::OutboundChannel;
