//! Core type definitions used across the SlotBot workspace.

pub mod period;
pub mod timezone;

pub use period::LeaderboardPeriod;
pub use timezone::ReferenceZone;
