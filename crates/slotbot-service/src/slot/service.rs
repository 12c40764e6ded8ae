//! Slot listing, status/payout edits and deletion.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use slotbot_core::error::AppError;
use slotbot_core::events::EventKind;
use slotbot_core::result::AppResult;
use slotbot_core::traits::Clock;
use slotbot_database::SlotStore;
use slotbot_entity::slot::{Slot, SlotFilter, SlotPatch, SlotStatus};
use slotbot_realtime::BroadcastHub;

use crate::settings::SettingsCache;

/// An operator edit. At least one field must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotUpdate {
    /// New status.
    pub status: Option<SlotStatus>,
    /// New payout.
    pub payout: Option<f64>,
    /// New text.
    pub message: Option<String>,
}

/// Slot mutations driven by operators.
pub struct SlotService {
    store: Arc<dyn SlotStore>,
    settings: Arc<SettingsCache>,
    hub: BroadcastHub,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SlotService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotService")
            .field("store", &self.store)
            .finish()
    }
}

impl SlotService {
    /// Creates a new slot service.
    pub fn new(
        store: Arc<dyn SlotStore>,
        settings: Arc<SettingsCache>,
        hub: BroadcastHub,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            settings,
            hub,
            clock,
        }
    }

    /// Slots matching `filter`, oldest first.
    pub async fn list(&self, filter: &SlotFilter) -> AppResult<Vec<Slot>> {
        self.store.find(filter).await
    }

    /// Apply an operator edit.
    ///
    /// Setting OUT starts the cooldown and counts the transition; every other
    /// edit clears the cooldown.
    pub async fn update(&self, id: Uuid, update: SlotUpdate) -> AppResult<Slot> {
        let message = match update.message {
            Some(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(AppError::validation("Message must not be empty"));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };
        if let Some(payout) = update.payout {
            if !payout.is_finite() {
                return Err(AppError::validation("Invalid payout amount"));
            }
        }
        if update.status.is_none() && update.payout.is_none() && message.is_none() {
            return Err(AppError::validation("Nothing to update"));
        }

        let existing = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Slot not found"))?;

        let now = self.clock.now();
        let mut patch = SlotPatch {
            status: update.status,
            payout: update.payout,
            message,
            status_changed_at: update.status.map(|_| now),
            cooldown_expires_at: None,
            increment_out_count: false,
        };
        if update.status == Some(SlotStatus::Out) {
            let cooldown = self.settings.get().out_cooldown();
            patch.cooldown_expires_at = Some(
                now.checked_add_signed(cooldown)
                    .ok_or_else(|| AppError::validation("Cooldown is too long"))?,
            );
            patch.increment_out_count = existing.status != Some(SlotStatus::Out);
        }

        let updated = self
            .store
            .update(id, &patch)
            .await?
            .ok_or_else(|| AppError::not_found("Slot not found"))?;

        info!(
            slot_id = %id,
            status = ?updated.status,
            payout = ?updated.payout,
            out_count = updated.out_count,
            "Slot updated"
        );
        self.hub.publish_json(EventKind::Update, &updated);
        Ok(updated)
    }

    /// Delete a slot.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::not_found("Slot not found"));
        }
        info!(slot_id = %id, "Slot deleted");
        self.hub.publish_json(EventKind::Delete, &json!({ "id": id }));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use slotbot_core::error::ErrorKind;
    use slotbot_core::traits::ManualClock;
    use slotbot_database::MemoryDatabase;
    use slotbot_entity::chat::Badges;
    use slotbot_entity::settings::Settings;
    use slotbot_entity::slot::NewSlot;

    struct Fixture {
        service: SlotService,
        db: MemoryDatabase,
        clock: Arc<ManualClock>,
        hub: BroadcastHub,
    }

    fn fixture() -> Fixture {
        let clock = Arc::new(ManualClock::new(
            DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        ));
        let db = MemoryDatabase::new();
        let hub = BroadcastHub::new(8);
        let settings = Arc::new(SettingsCache::new(Settings {
            out_cooldown_minutes: 10.0,
            ..Settings::default()
        }));
        let service = SlotService::new(Arc::new(db.clone()), settings, hub.clone(), clock.clone());
        Fixture {
            service,
            db,
            clock,
            hub,
        }
    }

    async fn seed(f: &Fixture) -> Slot {
        SlotStore::insert(
            &f.db,
            NewSlot {
                session_id: Uuid::new_v4(),
                time: f.clock.now(),
                local_date: f.clock.now().date_naive(),
                user: "alice".to_string(),
                message: "Sweet Bonanza".to_string(),
                badges: Badges::default(),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_out_then_in_then_out() {
        let f = fixture();
        let slot = seed(&f).await;

        let out = f
            .service
            .update(
                slot.id,
                SlotUpdate {
                    status: Some(SlotStatus::Out),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(out.out_count, 1);
        assert_eq!(out.cooldown_expires_at, Some(f.clock.now() + Duration::minutes(10)));

        let back_in = f
            .service
            .update(
                slot.id,
                SlotUpdate {
                    status: Some(SlotStatus::In),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(back_in.cooldown_expires_at.is_none());
        assert_eq!(back_in.out_count, 1);

        let out_again = f
            .service
            .update(
                slot.id,
                SlotUpdate {
                    status: Some(SlotStatus::Out),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(out_again.out_count, 2);
    }

    #[tokio::test]
    async fn test_unrepresentable_cooldown_is_a_validation_error() {
        let f = fixture();
        let slot = seed(&f).await;
        let settings = Arc::new(SettingsCache::new(Settings {
            out_cooldown_minutes: 1e15,
            ..Settings::default()
        }));
        let service = SlotService::new(Arc::new(f.db.clone()), settings, f.hub.clone(), f.clock.clone());

        let err = service
            .update(
                slot.id,
                SlotUpdate {
                    status: Some(SlotStatus::Out),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let stored = SlotStore::get(&f.db, slot.id).await.unwrap().unwrap();
        assert_eq!(stored.status, None);
        assert_eq!(stored.out_count, 0);
    }

    #[tokio::test]
    async fn test_payout_edit_clears_cooldown() {
        let f = fixture();
        let slot = seed(&f).await;
        f.service
            .update(
                slot.id,
                SlotUpdate {
                    status: Some(SlotStatus::Out),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let edited = f
            .service
            .update(
                slot.id,
                SlotUpdate {
                    payout: Some(120.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.payout, Some(120.0));
        assert_eq!(edited.status, Some(SlotStatus::Out));
        assert!(edited.cooldown_expires_at.is_none());
    }

    #[tokio::test]
    async fn test_update_validation_and_missing() {
        let f = fixture();
        let slot = seed(&f).await;
        let empty = f.service.update(slot.id, SlotUpdate::default()).await.unwrap_err();
        assert_eq!(empty.kind, ErrorKind::Validation);
        let blank = f
            .service
            .update(
                slot.id,
                SlotUpdate {
                    message: Some("   ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(blank.kind, ErrorKind::Validation);
        let missing = f
            .service
            .update(
                Uuid::new_v4(),
                SlotUpdate {
                    payout: Some(1.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(missing.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_and_delete_publish() {
        let f = fixture();
        let slot = seed(&f).await;
        let mut observer = f.hub.register();
        f.service
            .update(
                slot.id,
                SlotUpdate {
                    message: Some("Wanted Dead or a Wild".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let event = observer.recv().await.unwrap();
        assert_eq!(event.kind, EventKind::Update);
        assert_eq!(event.payload["message"], "Wanted Dead or a Wild");

        f.service.delete(slot.id).await.unwrap();
        let event = observer.recv().await.unwrap();
        assert_eq!(event.kind, EventKind::Delete);
        assert_eq!(event.payload["id"], slot.id.to_string());
        assert_eq!(
            f.service.delete(slot.id).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
    }
}
