//! Current-session resolution with lazy rollover.

use std::sync::Arc;

use chrono::Duration;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use slotbot_core::result::AppResult;
use slotbot_core::traits::Clock;
use slotbot_database::SessionStore;
use slotbot_entity::session::{NewSession, Session};

/// Owns the notion of "the current session".
///
/// There is no background sweep: the current session is re-derived on every
/// call from the most recently active row.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    inactivity: Duration,
    rollover: Mutex<()>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("store", &self.store)
            .field("inactivity", &self.inactivity)
            .finish()
    }
}

impl SessionManager {
    /// Create a manager that rolls over after `inactivity_minutes` idle.
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>, inactivity_minutes: u64) -> Self {
        Self {
            store,
            clock,
            inactivity: Duration::minutes(inactivity_minutes as i64),
            rollover: Mutex::new(()),
        }
    }

    /// The current session, opening a new one if none exists or the latest
    /// has been idle past the threshold.
    pub async fn current(&self) -> AppResult<Session> {
        let _guard = self.rollover.lock().await;
        let now = self.clock.now();

        if let Some(latest) = self.store.latest_by_activity().await? {
            if !latest.is_stale(now, self.inactivity) {
                return Ok(latest);
            }
            info!(
                previous_session = %latest.id,
                idle_minutes = latest.idle_for(now).num_minutes(),
                "Session idle past threshold, starting a new one"
            );
        }

        let session = self.store.insert(NewSession::starting_at(now)).await?;
        info!(session_id = %session.id, label = %session.label, "Session started");
        Ok(session)
    }

    /// The current session if one is live, without opening a new one.
    pub async fn peek(&self) -> AppResult<Option<Session>> {
        let now = self.clock.now();
        Ok(self
            .store
            .latest_by_activity()
            .await?
            .filter(|s| !s.is_stale(now, self.inactivity)))
    }

    /// Record activity on a session.
    pub async fn touch(&self, id: Uuid) -> AppResult<()> {
        self.store.touch(id, self.clock.now()).await
    }

    /// All sessions, newest first.
    pub async fn list(&self) -> AppResult<Vec<Session>> {
        self.store.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use slotbot_core::traits::ManualClock;
    use slotbot_database::MemoryDatabase;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T18:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn manager(clock: Arc<ManualClock>) -> SessionManager {
        SessionManager::new(Arc::new(MemoryDatabase::new()), clock, 120)
    }

    #[tokio::test]
    async fn test_continuity_within_threshold() {
        let clock = Arc::new(ManualClock::new(start()));
        let sessions = manager(clock.clone());
        let first = sessions.current().await.unwrap();
        clock.advance(Duration::minutes(90));
        sessions.touch(first.id).await.unwrap();
        clock.advance(Duration::minutes(100));
        let again = sessions.current().await.unwrap();
        assert_eq!(first.id, again.id);
    }

    #[tokio::test]
    async fn test_rollover_after_threshold() {
        let clock = Arc::new(ManualClock::new(start()));
        let sessions = manager(clock.clone());
        let first = sessions.current().await.unwrap();
        clock.advance(Duration::minutes(121));
        assert!(sessions.peek().await.unwrap().is_none());
        let second = sessions.current().await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(sessions.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_first_arrivals_share_session() {
        let clock = Arc::new(ManualClock::new(start()));
        let sessions = Arc::new(manager(clock));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let sessions = Arc::clone(&sessions);
            handles.push(tokio::spawn(async move { sessions.current().await.unwrap().id }));
        }
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(sessions.list().await.unwrap().len(), 1);
    }
}
