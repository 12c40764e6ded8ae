//! Settings repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use slotbot_core::error::{AppError, ErrorKind};
use slotbot_core::result::AppResult;
use slotbot_entity::settings::Settings;

use super::SettingsStore;

/// PostgreSQL-backed settings store. The table holds a single row, `id = 1`.
#[derive(Debug, Clone)]
pub struct PgSettingsRepository {
    pool: PgPool,
}

impl PgSettingsRepository {
    /// Create a new settings repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for PgSettingsRepository {
    async fn get(&self) -> AppResult<Option<Settings>> {
        sqlx::query_as::<_, Settings>(
            "SELECT enabled, follower_limit, subscriber_limit, vip_limit, moderator_limit, \
             out_cooldown_minutes FROM settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load settings", e))
    }

    async fn upsert(&self, settings: &Settings) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO settings (id, enabled, follower_limit, subscriber_limit, vip_limit, \
             moderator_limit, out_cooldown_minutes, updated_at) \
             VALUES (1, $1, $2, $3, $4, $5, $6, NOW()) \
             ON CONFLICT (id) DO UPDATE SET \
                enabled = EXCLUDED.enabled, \
                follower_limit = EXCLUDED.follower_limit, \
                subscriber_limit = EXCLUDED.subscriber_limit, \
                vip_limit = EXCLUDED.vip_limit, \
                moderator_limit = EXCLUDED.moderator_limit, \
                out_cooldown_minutes = EXCLUDED.out_cooldown_minutes, \
                updated_at = NOW()",
        )
        .bind(settings.enabled)
        .bind(settings.follower_limit)
        .bind(settings.subscriber_limit)
        .bind(settings.vip_limit)
        .bind(settings.moderator_limit)
        .bind(settings.out_cooldown_minutes)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save settings", e))?;
        Ok(())
    }
}
