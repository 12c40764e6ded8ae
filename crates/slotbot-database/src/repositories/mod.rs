//! Store contracts and their PostgreSQL implementations.
//!
//! The traits are the seam the service layer depends on; every method maps
//! failures to `ErrorKind::Database`.

pub mod session;
pub mod settings;
pub mod slot;
pub mod timeout;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use slotbot_core::result::AppResult;
use slotbot_entity::session::{NewSession, Session};
use slotbot_entity::settings::Settings;
use slotbot_entity::slot::{NewSlot, Slot, SlotFilter, SlotPatch};
use slotbot_entity::timeout::{NewTimeout, Timeout};

pub use session::PgSessionRepository;
pub use settings::PgSettingsRepository;
pub use slot::PgSlotRepository;
pub use timeout::PgTimeoutRepository;

/// Durable slot records.
#[async_trait]
pub trait SlotStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a new slot and return it.
    async fn insert(&self, slot: NewSlot) -> AppResult<Slot>;

    /// Fetch one slot.
    async fn get(&self, id: Uuid) -> AppResult<Option<Slot>>;

    /// All slots matching `filter`, ordered by admission time ascending.
    async fn find(&self, filter: &SlotFilter) -> AppResult<Vec<Slot>>;

    /// Most recently admitted slot with this text in this session.
    async fn latest_by_message(&self, session_id: Uuid, message: &str) -> AppResult<Option<Slot>>;

    /// Number of slots `user` holds in the session.
    async fn count_by_user(&self, session_id: Uuid, user: &str) -> AppResult<i64>;

    /// Apply an update; `None` when the slot does not exist.
    async fn update(&self, id: Uuid, patch: &SlotPatch) -> AppResult<Option<Slot>>;

    /// Delete a slot. Returns `true` if it existed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Session records.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Session with the greatest `last_activity`.
    async fn latest_by_activity(&self) -> AppResult<Option<Session>>;

    /// Persist a new session.
    async fn insert(&self, session: NewSession) -> AppResult<Session>;

    /// Set `last_activity`.
    async fn touch(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// All sessions, newest start first.
    async fn list(&self) -> AppResult<Vec<Session>>;
}

/// The settings singleton.
#[async_trait]
pub trait SettingsStore: Send + Sync + std::fmt::Debug + 'static {
    /// Current row, if one was ever written.
    async fn get(&self) -> AppResult<Option<Settings>>;

    /// Replace the row.
    async fn upsert(&self, settings: &Settings) -> AppResult<()>;
}

/// Timeout records.
#[async_trait]
pub trait TimeoutStore: Send + Sync + std::fmt::Debug + 'static {
    /// Timeout with the latest expiry for `user`.
    async fn latest_for(&self, user: &str) -> AppResult<Option<Timeout>>;

    /// Persist a new timeout.
    async fn insert(&self, timeout: NewTimeout) -> AppResult<Timeout>;

    /// Delete a timeout. Returns `true` if it existed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Timeouts with `expires_at > now`, soonest expiry first.
    async fn list_active(&self, now: DateTime<Utc>) -> AppResult<Vec<Timeout>>;
}
