//! Issue, lift and query user timeouts.

use std::sync::Arc;

use chrono::Duration;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use slotbot_core::error::AppError;
use slotbot_core::events::EventKind;
use slotbot_core::result::AppResult;
use slotbot_core::traits::Clock;
use slotbot_database::TimeoutStore;
use slotbot_entity::timeout::{NewTimeout, Timeout};
use slotbot_realtime::BroadcastHub;

/// Operator-facing timeout management.
pub struct TimeoutService {
    store: Arc<dyn TimeoutStore>,
    hub: BroadcastHub,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TimeoutService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeoutService")
            .field("store", &self.store)
            .finish()
    }
}

impl TimeoutService {
    /// Creates a new timeout service.
    pub fn new(store: Arc<dyn TimeoutStore>, hub: BroadcastHub, clock: Arc<dyn Clock>) -> Self {
        Self { store, hub, clock }
    }

    /// Time `user` out for `minutes` from now.
    pub async fn add(&self, user: &str, minutes: f64) -> AppResult<Timeout> {
        let user = user.trim();
        if user.is_empty() {
            return Err(AppError::validation("User is required"));
        }
        if !minutes.is_finite() || minutes <= 0.0 {
            return Err(AppError::validation("Duration must be a positive number of minutes"));
        }
        let now = self.clock.now();
        let expires_at = Duration::try_milliseconds((minutes * 60_000.0).round() as i64)
            .and_then(|length| now.checked_add_signed(length))
            .ok_or_else(|| AppError::validation("Duration is too long"))?;
        let timeout = self
            .store
            .insert(NewTimeout {
                user: user.to_string(),
                expires_at,
                created_at: now,
            })
            .await?;

        info!(user = %timeout.user, expires_at = %timeout.expires_at, "User timed out");
        self.hub.publish_json(EventKind::TimeoutAdd, &timeout);
        Ok(timeout)
    }

    /// Lift a timeout early.
    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::not_found("Timeout not found"));
        }
        info!(timeout_id = %id, "Timeout removed");
        self.hub.publish_json(EventKind::TimeoutRemove, &json!({ "id": id }));
        Ok(())
    }

    /// Timeouts that have not expired yet.
    pub async fn list_active(&self) -> AppResult<Vec<Timeout>> {
        self.store.list_active(self.clock.now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use slotbot_core::error::ErrorKind;
    use slotbot_core::traits::ManualClock;
    use slotbot_database::MemoryDatabase;

    fn setup() -> (TimeoutService, Arc<ManualClock>, BroadcastHub) {
        let clock = Arc::new(ManualClock::new(
            DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        ));
        let hub = BroadcastHub::new(8);
        let service = TimeoutService::new(Arc::new(MemoryDatabase::new()), hub.clone(), clock.clone());
        (service, clock, hub)
    }

    #[tokio::test]
    async fn test_add_list_and_expire() {
        let (service, clock, hub) = setup();
        let mut observer = hub.register();
        let timeout = service.add("spammer", 15.0).await.unwrap();
        assert_eq!(timeout.remaining(clock.now()), Duration::minutes(15));
        assert_eq!(observer.recv().await.unwrap().kind, EventKind::TimeoutAdd);

        assert_eq!(service.list_active().await.unwrap().len(), 1);
        clock.advance(Duration::minutes(16));
        assert!(service.list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_publishes_and_404s() {
        let (service, _clock, hub) = setup();
        let timeout = service.add("spammer", 5.0).await.unwrap();
        let mut observer = hub.register();
        service.remove(timeout.id).await.unwrap();
        let event = observer.recv().await.unwrap();
        assert_eq!(event.kind, EventKind::TimeoutRemove);
        assert_eq!(event.payload["id"], timeout.id.to_string());

        let err = service.remove(timeout.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_rejects_bad_input() {
        let (service, _, _) = setup();
        assert!(service.add("x", 0.0).await.is_err());
        assert!(service.add("x", -3.0).await.is_err());
        assert!(service.add("  ", 3.0).await.is_err());
    }

    #[tokio::test]
    async fn test_out_of_range_duration_is_a_validation_error() {
        let (service, clock, _) = setup();
        let err = service.add("x", 1e15).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Duration is too long");
        assert!(service.store.list_active(clock.now()).await.unwrap().is_empty());
    }
}
