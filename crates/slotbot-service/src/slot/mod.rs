//! Operator slot management and rankings.

pub mod leaderboard;
pub mod service;

pub use leaderboard::LeaderboardService;
pub use service::{SlotService, SlotUpdate};
