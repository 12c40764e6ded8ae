//! Settings load, seed and update.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use slotbot_core::config::SettingsSeed;
use slotbot_core::error::{AppError, ErrorKind};
use slotbot_core::events::EventKind;
use slotbot_core::result::AppResult;
use slotbot_database::SettingsStore;
use slotbot_entity::settings::{Settings, SettingsPatch};
use slotbot_realtime::BroadcastHub;

use super::cache::SettingsCache;

/// Reads come from the cache; writes go store → read back → swap → publish.
#[derive(Debug)]
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
    cache: Arc<SettingsCache>,
    hub: BroadcastHub,
    writer: Mutex<()>,
}

impl SettingsService {
    /// Load settings, writing `seed` first if the store is empty.
    ///
    /// Any store failure here is a startup failure.
    pub async fn load(
        store: Arc<dyn SettingsStore>,
        hub: BroadcastHub,
        seed: &SettingsSeed,
    ) -> AppResult<Self> {
        let loaded = match store.get().await.map_err(startup_error)? {
            Some(settings) => settings,
            None => {
                let seeded = Settings::from(seed);
                validate(&seeded)?;
                store.upsert(&seeded).await.map_err(startup_error)?;
                info!(settings = ?seeded, "Seeded settings from configuration");
                seeded
            }
        };
        info!(
            enabled = loaded.enabled,
            follower_limit = loaded.follower_limit,
            subscriber_limit = loaded.subscriber_limit,
            vip_limit = loaded.vip_limit,
            moderator_limit = loaded.moderator_limit,
            out_cooldown_minutes = loaded.out_cooldown_minutes,
            "Settings loaded"
        );
        Ok(Self {
            store,
            cache: Arc::new(SettingsCache::new(loaded)),
            hub,
            writer: Mutex::new(()),
        })
    }

    /// Shared handle to the snapshot cache.
    pub fn cache(&self) -> Arc<SettingsCache> {
        Arc::clone(&self.cache)
    }

    /// Current settings, from memory.
    pub fn current(&self) -> Arc<Settings> {
        self.cache.get()
    }

    /// Apply a partial update. Returns once the new snapshot is visible.
    pub async fn update(&self, patch: &SettingsPatch) -> AppResult<Arc<Settings>> {
        if patch.is_empty() {
            return Err(AppError::validation("Nothing to update"));
        }
        let _guard = self.writer.lock().await;

        let next = self.cache.get().merged(patch);
        validate(&next)?;
        self.store.upsert(&next).await?;

        let stored = match self.store.get().await? {
            Some(stored) => stored,
            None => {
                warn!("Settings row missing after write");
                return Err(AppError::database("Settings row missing after write"));
            }
        };
        let snapshot = self.cache.replace(stored);
        self.hub.publish_json(EventKind::Settings, snapshot.as_ref());
        info!(settings = ?snapshot, "Settings updated");
        Ok(snapshot)
    }
}

/// One year.
pub const MAX_COOLDOWN_MINUTES: f64 = 525_600.0;

fn validate(settings: &Settings) -> AppResult<()> {
    let limits = [
        ("follower_limit", settings.follower_limit),
        ("subscriber_limit", settings.subscriber_limit),
        ("vip_limit", settings.vip_limit),
        ("moderator_limit", settings.moderator_limit),
    ];
    for (name, value) in limits {
        if value < 0 {
            return Err(AppError::validation(format!("{name} must not be negative")));
        }
    }
    if !settings.out_cooldown_minutes.is_finite() || settings.out_cooldown_minutes < 0.0 {
        return Err(AppError::validation(
            "out_cooldown_minutes must be a non-negative number",
        ));
    }
    if settings.out_cooldown_minutes > MAX_COOLDOWN_MINUTES {
        return Err(AppError::validation(format!(
            "out_cooldown_minutes must be at most {MAX_COOLDOWN_MINUTES}"
        )));
    }
    Ok(())
}

fn startup_error(e: AppError) -> AppError {
    AppError::with_source(
        ErrorKind::Configuration,
        format!("Settings store unavailable at startup: {}", e.message),
        e,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotbot_database::MemoryDatabase;

    #[tokio::test]
    async fn test_seed_when_empty() {
        let db = MemoryDatabase::new();
        let seed = SettingsSeed {
            enabled: true,
            follower_limit: 4,
            ..SettingsSeed::default()
        };
        let service = SettingsService::load(Arc::new(db.clone()), BroadcastHub::new(4), &seed)
            .await
            .unwrap();
        assert_eq!(service.current().follower_limit, 4);
        assert_eq!(
            SettingsStore::get(&db).await.unwrap().unwrap().follower_limit,
            4
        );
    }

    #[tokio::test]
    async fn test_existing_row_wins_over_seed() {
        let db = MemoryDatabase::new();
        db.upsert(&Settings {
            vip_limit: 11,
            ..Settings::default()
        })
        .await
        .unwrap();
        let service =
            SettingsService::load(Arc::new(db), BroadcastHub::new(4), &SettingsSeed::default())
                .await
                .unwrap();
        assert_eq!(service.current().vip_limit, 11);
    }

    #[tokio::test]
    async fn test_update_swaps_and_publishes() {
        let hub = BroadcastHub::new(4);
        let mut observer = hub.register();
        let service = SettingsService::load(
            Arc::new(MemoryDatabase::new()),
            hub.clone(),
            &SettingsSeed::default(),
        )
        .await
        .unwrap();

        let updated = service
            .update(&SettingsPatch {
                enabled: Some(true),
                out_cooldown_minutes: Some(2.5),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(updated.enabled);
        assert!(service.current().enabled);
        let event = observer.recv().await.unwrap();
        assert_eq!(event.kind, EventKind::Settings);
        assert_eq!(event.payload["out_cooldown_minutes"], 2.5);
    }

    #[tokio::test]
    async fn test_rejects_negative_limits_and_empty_patch() {
        let service = SettingsService::load(
            Arc::new(MemoryDatabase::new()),
            BroadcastHub::new(4),
            &SettingsSeed::default(),
        )
        .await
        .unwrap();
        let err = service
            .update(&SettingsPatch {
                vip_limit: Some(-1),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(service.update(&SettingsPatch::default()).await.is_err());
        assert_eq!(service.current().vip_limit, SettingsSeed::default().vip_limit);
    }

    #[tokio::test]
    async fn test_rejects_cooldown_beyond_a_year() {
        let service = SettingsService::load(
            Arc::new(MemoryDatabase::new()),
            BroadcastHub::new(4),
            &SettingsSeed::default(),
        )
        .await
        .unwrap();
        let err = service
            .update(&SettingsPatch {
                out_cooldown_minutes: Some(1e15),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(
            service
                .update(&SettingsPatch {
                    out_cooldown_minutes: Some(MAX_COOLDOWN_MINUTES),
                    ..Default::default()
                })
                .await
                .is_ok()
        );
    }
}
