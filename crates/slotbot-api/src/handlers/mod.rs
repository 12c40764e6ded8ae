//! Request handlers, one module per resource.

pub mod events;
pub mod health;
pub mod leaderboard;
pub mod sessions;
pub mod settings;
pub mod slots;
pub mod timeouts;
