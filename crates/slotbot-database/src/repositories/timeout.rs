//! Timeout repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use slotbot_core::error::{AppError, ErrorKind};
use slotbot_core::result::AppResult;
use slotbot_entity::timeout::{NewTimeout, Timeout};

use super::TimeoutStore;

/// PostgreSQL-backed timeout store.
#[derive(Debug, Clone)]
pub struct PgTimeoutRepository {
    pool: PgPool,
}

impl PgTimeoutRepository {
    /// Create a new timeout repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TimeoutStore for PgTimeoutRepository {
    async fn latest_for(&self, user: &str) -> AppResult<Option<Timeout>> {
        sqlx::query_as::<_, Timeout>(
            "SELECT id, user_name, expires_at, created_at FROM timeouts WHERE user_name = $1 \
             ORDER BY expires_at DESC LIMIT 1",
        )
        .bind(user)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find timeout", e))
    }

    async fn insert(&self, timeout: NewTimeout) -> AppResult<Timeout> {
        sqlx::query_as::<_, Timeout>(
            "INSERT INTO timeouts (id, user_name, expires_at, created_at) VALUES ($1, $2, $3, $4) \
             RETURNING id, user_name, expires_at, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&timeout.user)
        .bind(timeout.expires_at)
        .bind(timeout.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create timeout", e))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM timeouts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete timeout", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_active(&self, now: DateTime<Utc>) -> AppResult<Vec<Timeout>> {
        sqlx::query_as::<_, Timeout>(
            "SELECT id, user_name, expires_at, created_at FROM timeouts WHERE expires_at > $1 \
             ORDER BY expires_at ASC",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list timeouts", e))
    }
}
