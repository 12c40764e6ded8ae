//! # slotbot-core
//!
//! Core crate for SlotBot. Contains the configuration schemas, the unified
//! error system, hub events, capability traits (outbound reply channel,
//! notifier, clock), and small shared value types.
//!
//! This crate has **no** internal dependencies on other SlotBot crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
