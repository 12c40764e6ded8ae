//! # slotbot-database
//!
//! Store contracts for sessions, slots, settings and timeouts, with a
//! PostgreSQL implementation (sqlx) and an in-memory implementation used by
//! tests and dry runs. [`Stores`] selects the implementation from config.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod provider;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::MemoryDatabase;
pub use provider::Stores;
pub use repositories::{SessionStore, SettingsStore, SlotStore, TimeoutStore};
