//! # slotbot-entity
//!
//! Domain entity models for SlotBot. Every struct in this crate represents a
//! database table row or a domain value object. All entities derive `Debug`,
//! `Clone`, `Serialize`, `Deserialize`, and database entities additionally
//! derive `sqlx::FromRow`.

pub mod chat;
pub mod leaderboard;
pub mod session;
pub mod settings;
pub mod slot;
pub mod timeout;
