//! Service bundle shared by the chat pipeline, the HTTP API and the CLI.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use slotbot_core::config::AppConfig;
use slotbot_core::error::AppError;
use slotbot_core::result::AppResult;
use slotbot_core::traits::{Clock, Notifier};
use slotbot_core::types::ReferenceZone;
use slotbot_database::Stores;
use slotbot_realtime::BroadcastHub;

use crate::admission::AdmissionEngine;
use crate::session::SessionManager;
use crate::settings::SettingsService;
use crate::slot::{LeaderboardService, SlotService};
use crate::timeout::TimeoutService;

/// Every service, wired to one set of stores, one hub and one clock.
#[derive(Debug, Clone)]
pub struct Services {
    /// Session lifecycle.
    pub sessions: Arc<SessionManager>,
    /// Settings reads and writes.
    pub settings: Arc<SettingsService>,
    /// Timeout registry.
    pub timeouts: Arc<TimeoutService>,
    /// Operator slot edits.
    pub slots: Arc<SlotService>,
    /// Rankings.
    pub leaderboard: Arc<LeaderboardService>,
    /// Chat command admission.
    pub engine: Arc<AdmissionEngine>,
    /// Observer fan-out.
    pub hub: BroadcastHub,
    /// Backing stores.
    pub stores: Stores,
}

impl Services {
    /// Build every service. Loads (or seeds) settings, so this fails when the
    /// settings store is unreachable.
    pub async fn build(
        config: &AppConfig,
        stores: Stores,
        hub: BroadcastHub,
        clock: Arc<dyn Clock>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> AppResult<Self> {
        let zone = ReferenceZone::from_minutes(config.chat.utc_offset_minutes)?;
        let storage_timeout = Duration::from_millis(config.database.statement_timeout_ms);
        let decision_budget = decision_budget(config.reply.decision_timeout_ms);
        if storage_timeout * 2 >= decision_budget {
            return Err(AppError::configuration(format!(
                "reply.decision_timeout_ms ({}) leaves no room for two storage calls of {} ms",
                config.reply.decision_timeout_ms, config.database.statement_timeout_ms
            )));
        }

        let sessions = Arc::new(SessionManager::new(
            Arc::clone(&stores.sessions),
            Arc::clone(&clock),
            config.session.inactivity_minutes,
        ));
        let settings = Arc::new(
            SettingsService::load(Arc::clone(&stores.settings), hub.clone(), &config.settings)
                .await?,
        );
        let timeouts = Arc::new(TimeoutService::new(
            Arc::clone(&stores.timeouts),
            hub.clone(),
            Arc::clone(&clock),
        ));
        let slots = Arc::new(SlotService::new(
            Arc::clone(&stores.slots),
            settings.cache(),
            hub.clone(),
            Arc::clone(&clock),
        ));
        let leaderboard = Arc::new(LeaderboardService::new(
            Arc::clone(&stores.slots),
            Arc::clone(&clock),
            zone,
        ));

        let mut engine = AdmissionEngine::new(
            Arc::clone(&sessions),
            settings.cache(),
            Arc::clone(&stores.slots),
            Arc::clone(&stores.timeouts),
            Arc::clone(&leaderboard),
            hub.clone(),
            clock,
        )
        .with_zone(zone)
        .with_prefix(config.chat.command_prefix.clone())
        .with_storage_timeout(storage_timeout)
        .with_decision_budget(decision_budget);
        if let Some(notifier) = notifier {
            engine = engine.with_notifier(notifier, Duration::from_millis(config.notify.timeout_ms));
        }

        info!(
            inactivity_minutes = config.session.inactivity_minutes,
            utc_offset_minutes = config.chat.utc_offset_minutes,
            prefix = %config.chat.command_prefix,
            "Services initialized"
        );

        Ok(Self {
            sessions,
            settings,
            timeouts,
            slots,
            leaderboard,
            engine: Arc::new(engine),
            hub,
            stores,
        })
    }
}

/// Time an admission may take: four fifths of the runner's decision timeout.
fn decision_budget(decision_timeout_ms: u64) -> Duration {
    Duration::from_millis(decision_timeout_ms / 5 * 4)
}
