//! The admission pipeline for chat commands.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{self, Instant};
use tracing::{debug, error, info, warn};

use slotbot_core::error::AppError;
use slotbot_core::events::EventKind;
use slotbot_core::result::AppResult;
use slotbot_core::traits::{Clock, Notifier};
use slotbot_core::types::{LeaderboardPeriod, ReferenceZone};
use slotbot_database::{SlotStore, TimeoutStore};
use slotbot_entity::chat::{ChatCommand, ChatEvent};
use slotbot_entity::leaderboard::render;
use slotbot_entity::settings::Tier;
use slotbot_entity::slot::{NewSlot, SlotFilter, SlotStatus};

use super::decision::{Decision, Rejection, ceil_minutes};
use crate::session::SessionManager;
use crate::settings::SettingsCache;
use crate::slot::LeaderboardService;

/// Entries shown by chat leaderboard commands.
const CHAT_LEADERBOARD_SIZE: usize = 5;

/// Decides what happens to each chat command and what to reply.
///
/// Storage failures surface as `Err`: the command is dropped and nobody is
/// answered. Policy refusals are `Ok` with a reply.
pub struct AdmissionEngine {
    sessions: Arc<SessionManager>,
    settings: Arc<SettingsCache>,
    slots: Arc<dyn SlotStore>,
    timeouts: Arc<dyn TimeoutStore>,
    leaderboard: Arc<LeaderboardService>,
    hub: slotbot_realtime::BroadcastHub,
    clock: Arc<dyn Clock>,
    notifier: Option<Arc<dyn Notifier>>,
    notify_timeout: Duration,
    storage_timeout: Duration,
    decision_budget: Duration,
    zone: ReferenceZone,
    prefix: String,
    admission: Mutex<()>,
}

impl std::fmt::Debug for AdmissionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionEngine")
            .field("prefix", &self.prefix)
            .field("zone", &self.zone)
            .field("storage_timeout", &self.storage_timeout)
            .field("decision_budget", &self.decision_budget)
            .field("notifier", &self.notifier.is_some())
            .finish()
    }
}

impl AdmissionEngine {
    /// Create an engine with default options: `!` prefix, UTC, five-second
    /// storage bound, twelve-second decision budget, no notifier.
    pub fn new(
        sessions: Arc<SessionManager>,
        settings: Arc<SettingsCache>,
        slots: Arc<dyn SlotStore>,
        timeouts: Arc<dyn TimeoutStore>,
        leaderboard: Arc<LeaderboardService>,
        hub: slotbot_realtime::BroadcastHub,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            settings,
            slots,
            timeouts,
            leaderboard,
            hub,
            clock,
            notifier: None,
            notify_timeout: Duration::from_secs(5),
            storage_timeout: Duration::from_secs(5),
            decision_budget: Duration::from_secs(12),
            zone: ReferenceZone::utc(),
            prefix: "!".to_string(),
            admission: Mutex::new(()),
        }
    }

    /// Send a best-effort notification for every accepted slot.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>, timeout: Duration) -> Self {
        self.notifier = Some(notifier);
        self.notify_timeout = timeout;
        self
    }

    /// Bound every repository call.
    pub fn with_storage_timeout(mut self, timeout: Duration) -> Self {
        self.storage_timeout = timeout;
        self
    }

    /// Upper bound for one whole command, lock wait included.
    ///
    /// Must stay below the reply runner's decision timeout so that every
    /// written slot is answered.
    pub fn with_decision_budget(mut self, budget: Duration) -> Self {
        self.decision_budget = budget;
        self
    }

    /// Reference zone for `local_date`.
    pub fn with_zone(mut self, zone: ReferenceZone) -> Self {
        self.zone = zone;
        self
    }

    /// Command prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Recognise a command in an event.
    pub fn parse(&self, event: &ChatEvent) -> Option<ChatCommand> {
        ChatCommand::parse(&event.content, &self.prefix)
    }

    /// Parse and run an event. `Ok(None)` means "not a command".
    pub async fn handle(&self, event: &ChatEvent) -> AppResult<Option<String>> {
        match self.parse(event) {
            Some(command) => self.execute(event, &command).await.map(Some),
            None => Ok(None),
        }
    }

    /// Run a parsed command and return the reply text.
    pub async fn execute(&self, event: &ChatEvent, command: &ChatCommand) -> AppResult<String> {
        match command {
            ChatCommand::Slot { text } => {
                let decision = self.admit(event, text).await?;
                Ok(decision.reply(&event.user, text))
            }
            ChatCommand::MySlots => self.my_slots(&event.user).await,
            ChatCommand::Leaderboard(period) => self.leaderboard_reply(*period).await,
        }
    }

    /// Run the `!slot` pipeline: timeout, tier limit, duplicate/cooldown,
    /// then insert.
    ///
    /// The insert only starts while the decision budget still covers the
    /// insert and the session touch at their full storage bound.
    pub async fn admit(&self, event: &ChatEvent, text: &str) -> AppResult<Decision> {
        let deadline = Instant::now() + self.decision_budget;
        let user = event.user.as_str();

        if let Some(timeout) = self.bounded(deadline, self.timeouts.latest_for(user)).await? {
            let now = self.clock.now();
            if timeout.is_active(now) {
                let remaining_minutes = ceil_minutes(timeout.remaining(now));
                info!(user, remaining_minutes, "Slot refused: user timed out");
                return Ok(Decision::Rejected(Rejection::TimedOut { remaining_minutes }));
            }
        }

        let _admission = time::timeout_at(deadline, self.admission.lock())
            .await
            .map_err(|_| AppError::service_unavailable("Timed out waiting for the admission lock"))?;
        let session = self.bounded(deadline, self.sessions.current()).await?;
        let settings = self.settings.get();

        if settings.enabled {
            let tier = Tier::from_badges(&event.badges);
            let limit = settings.limit_for(tier);
            let count = self
                .bounded(deadline, self.slots.count_by_user(session.id, user))
                .await?;
            if count >= i64::from(limit) {
                info!(user, %tier, limit, count, "Slot refused: tier limit reached");
                return Ok(Decision::Rejected(Rejection::LimitReached { tier, limit }));
            }
        }

        if let Some(previous) = self
            .bounded(deadline, self.slots.latest_by_message(session.id, text))
            .await?
        {
            let now = self.clock.now();
            if previous.status == Some(SlotStatus::Out) {
                if let Some(remaining) = previous.cooldown_remaining(now) {
                    let remaining_minutes = ceil_minutes(remaining);
                    info!(user, message = text, remaining_minutes, "Slot refused: cooldown");
                    return Ok(Decision::Rejected(Rejection::Cooldown { remaining_minutes }));
                }
                debug!(user, message = text, previous = %previous.id, "Cooldown elapsed, slot re-admissible");
            } else {
                info!(user, message = text, "Slot refused: already called");
                return Ok(Decision::Rejected(Rejection::AlreadyCalled));
            }
        }

        if deadline.saturating_duration_since(Instant::now()) < self.storage_timeout * 2 {
            warn!(user, message = text, "Decision budget spent before insert, slot not written");
            return Err(AppError::service_unavailable("Decision budget spent before insert"));
        }

        let now = self.clock.now();
        let slot = self
            .bounded(deadline, self.slots.insert(NewSlot {
                session_id: session.id,
                time: now,
                local_date: self.zone.local_date(now),
                user: user.to_string(),
                message: text.to_string(),
                badges: event.badges,
            }))
            .await?;
        if let Err(e) = self.bounded(deadline, self.sessions.touch(session.id)).await {
            warn!(session_id = %session.id, error = %e, "Session touch failed after insert");
        }
        drop(_admission);

        info!(
            slot_id = %slot.id,
            session_id = %session.id,
            user,
            message = text,
            "Slot admitted"
        );
        self.hub.publish_json(EventKind::Slot, &slot);
        self.spawn_notification(format!("🎰 New slot **{}** by **{}**", slot.message, slot.user));
        Ok(Decision::Accepted(slot))
    }

    /// `!myslots`: the caller's slots in the live session, grouped by status.
    pub async fn my_slots(&self, user: &str) -> AppResult<String> {
        let deadline = Instant::now() + self.decision_budget;
        let slots = match self.bounded(deadline, self.sessions.peek()).await? {
            Some(session) => {
                self.bounded(
                    deadline,
                    self.slots
                        .find(&SlotFilter::for_user_in_session(session.id, user)),
                )
                .await?
            }
            None => Vec::new(),
        };

        let group = |status: Option<SlotStatus>| {
            let texts: Vec<&str> = slots
                .iter()
                .filter(|s| s.status == status)
                .map(|s| s.message.as_str())
                .collect();
            if texts.is_empty() {
                "none".to_string()
            } else {
                texts.join(", ")
            }
        };

        Ok(format!(
            "{user} - Slots in queue: {}; IN: {}; OUT: {}",
            group(None),
            group(Some(SlotStatus::In)),
            group(Some(SlotStatus::Out))
        ))
    }

    /// `!daily`, `!weekly`, `!monthly`.
    pub async fn leaderboard_reply(&self, period: LeaderboardPeriod) -> AppResult<String> {
        let deadline = Instant::now() + self.decision_budget;
        let top = self
            .bounded(deadline, self.leaderboard.top(period, CHAT_LEADERBOARD_SIZE))
            .await?;
        Ok(format!("Top {period}: {}", render(&top)))
    }

    /// Run a storage call under the storage bound, cut short by `deadline`.
    async fn bounded<T>(
        &self,
        deadline: Instant,
        call: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        let limit = deadline
            .saturating_duration_since(Instant::now())
            .min(self.storage_timeout);
        match time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(AppError::service_unavailable(format!(
                "Storage call exceeded {} ms",
                limit.as_millis()
            ))),
        }
    }

    fn spawn_notification(&self, text: String) {
        let Some(notifier) = self.notifier.clone() else {
            return;
        };
        let timeout = self.notify_timeout;
        tokio::spawn(async move {
            match time::timeout(timeout, notifier.notify(&text)).await {
                Ok(Ok(())) => debug!("Slot notification delivered"),
                Ok(Err(e)) => warn!(error = %e, "Slot notification failed"),
                Err(_) => error!(timeout_ms = timeout.as_millis() as u64, "Slot notification timed out"),
            }
        });
    }
}
