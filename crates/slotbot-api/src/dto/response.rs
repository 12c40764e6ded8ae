//! Response DTOs.

use serde::{Deserialize, Serialize};

use slotbot_core::types::LeaderboardPeriod;
use slotbot_entity::leaderboard::LeaderboardEntry;
use slotbot_worker::ReplyStatsSnapshot;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Ranking for one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    /// Period the ranking covers.
    pub period: LeaderboardPeriod,
    /// Users by played count, descending.
    pub entries: Vec<LeaderboardEntry>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since start.
    pub uptime_seconds: u64,
    /// `connected` or `unreachable`.
    pub database: String,
    /// Connected dashboard observers.
    pub observers: usize,
    /// Reply delivery totals.
    pub replies: ReplyStatsSnapshot,
}
