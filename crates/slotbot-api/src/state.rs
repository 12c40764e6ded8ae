//! Shared application state.

use std::sync::Arc;
use std::time::Instant;

use slotbot_core::config::AppConfig;
use slotbot_service::Services;
use slotbot_worker::ReplyStats;

/// State handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Service bundle.
    pub services: Services,
    /// Reply runner counters.
    pub reply_stats: Arc<ReplyStats>,
    /// Process start.
    pub started_at: Instant,
}

impl AppState {
    /// Creates the state.
    pub fn new(config: Arc<AppConfig>, services: Services, reply_stats: Arc<ReplyStats>) -> Self {
        Self {
            config,
            services,
            reply_stats,
            started_at: Instant::now(),
        }
    }
}
