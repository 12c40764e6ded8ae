//! Slot domain entities.

pub mod filter;
pub mod model;
pub mod status;

pub use filter::SlotFilter;
pub use model::{NewSlot, Slot, SlotPatch};
pub use status::{SlotStatus, StatusFilter};
