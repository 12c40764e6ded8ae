//! In-memory implementation of every store, for tests and dry runs.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use slotbot_core::result::AppResult;
use slotbot_entity::session::{NewSession, Session};
use slotbot_entity::settings::Settings;
use slotbot_entity::slot::{NewSlot, Slot, SlotFilter, SlotPatch};
use slotbot_entity::timeout::{NewTimeout, Timeout};

use crate::repositories::{SessionStore, SettingsStore, SlotStore, TimeoutStore};

#[derive(Debug, Default)]
struct Tables {
    sessions: Vec<Session>,
    slots: Vec<Slot>,
    settings: Option<Settings>,
    timeouts: Vec<Timeout>,
}

/// All tables behind one lock. Cloning shares the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SlotStore for MemoryDatabase {
    async fn insert(&self, slot: NewSlot) -> AppResult<Slot> {
        let slot = slot.into_slot(Uuid::new_v4());
        self.tables.write().await.slots.push(slot.clone());
        Ok(slot)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Slot>> {
        let tables = self.tables.read().await;
        Ok(tables.slots.iter().find(|s| s.id == id).cloned())
    }

    async fn find(&self, filter: &SlotFilter) -> AppResult<Vec<Slot>> {
        let tables = self.tables.read().await;
        let mut found: Vec<Slot> = tables
            .slots
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        found.sort_by_key(|s| s.time);
        Ok(found)
    }

    async fn latest_by_message(&self, session_id: Uuid, message: &str) -> AppResult<Option<Slot>> {
        let tables = self.tables.read().await;
        Ok(tables
            .slots
            .iter()
            .filter(|s| s.session_id == session_id && s.message == message)
            .max_by_key(|s| s.time)
            .cloned())
    }

    async fn count_by_user(&self, session_id: Uuid, user: &str) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .slots
            .iter()
            .filter(|s| s.session_id == session_id && s.user == user)
            .count() as i64)
    }

    async fn update(&self, id: Uuid, patch: &SlotPatch) -> AppResult<Option<Slot>> {
        let mut tables = self.tables.write().await;
        Ok(tables.slots.iter_mut().find(|s| s.id == id).map(|slot| {
            slot.apply(patch);
            slot.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.slots.len();
        tables.slots.retain(|s| s.id != id);
        Ok(tables.slots.len() < before)
    }
}

#[async_trait]
impl SessionStore for MemoryDatabase {
    async fn latest_by_activity(&self) -> AppResult<Option<Session>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sessions
            .iter()
            .max_by_key(|s| s.last_activity)
            .cloned())
    }

    async fn insert(&self, session: NewSession) -> AppResult<Session> {
        let session = Session {
            id: Uuid::new_v4(),
            start_time: session.start_time,
            last_activity: session.start_time,
            label: session.label,
        };
        self.tables.write().await.sessions.push(session.clone());
        Ok(session)
    }

    async fn touch(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(session) = tables.sessions.iter_mut().find(|s| s.id == id) {
            session.last_activity = session.last_activity.max(at);
        }
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Session>> {
        let tables = self.tables.read().await;
        let mut sessions = tables.sessions.clone();
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(sessions)
    }
}

#[async_trait]
impl SettingsStore for MemoryDatabase {
    async fn get(&self) -> AppResult<Option<Settings>> {
        Ok(self.tables.read().await.settings.clone())
    }

    async fn upsert(&self, settings: &Settings) -> AppResult<()> {
        self.tables.write().await.settings = Some(settings.clone());
        Ok(())
    }
}

#[async_trait]
impl TimeoutStore for MemoryDatabase {
    async fn latest_for(&self, user: &str) -> AppResult<Option<Timeout>> {
        let tables = self.tables.read().await;
        Ok(tables
            .timeouts
            .iter()
            .filter(|t| t.user == user)
            .max_by_key(|t| t.expires_at)
            .cloned())
    }

    async fn insert(&self, timeout: NewTimeout) -> AppResult<Timeout> {
        let timeout = Timeout {
            id: Uuid::new_v4(),
            user: timeout.user,
            expires_at: timeout.expires_at,
            created_at: timeout.created_at,
        };
        self.tables.write().await.timeouts.push(timeout.clone());
        Ok(timeout)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.timeouts.len();
        tables.timeouts.retain(|t| t.id != id);
        Ok(tables.timeouts.len() < before)
    }

    async fn list_active(&self, now: DateTime<Utc>) -> AppResult<Vec<Timeout>> {
        let tables = self.tables.read().await;
        let mut active: Vec<Timeout> = tables
            .timeouts
            .iter()
            .filter(|t| t.is_active(now))
            .cloned()
            .collect();
        active.sort_by_key(|t| t.expires_at);
        Ok(active)
    }
}
