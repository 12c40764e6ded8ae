//! Session repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use slotbot_core::error::{AppError, ErrorKind};
use slotbot_core::result::AppResult;
use slotbot_entity::session::{NewSession, Session};

use super::SessionStore;

/// PostgreSQL-backed session store.
#[derive(Debug, Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionRepository {
    async fn latest_by_activity(&self) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT id, start_time, last_activity, label FROM sessions \
             ORDER BY last_activity DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find latest session", e))
    }

    async fn insert(&self, session: NewSession) -> AppResult<Session> {
        sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (id, start_time, last_activity, label) VALUES ($1, $2, $2, $3) \
             RETURNING id, start_time, last_activity, label",
        )
        .bind(Uuid::new_v4())
        .bind(session.start_time)
        .bind(&session.label)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))
    }

    async fn touch(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE sessions SET last_activity = GREATEST(last_activity, $2) WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update session activity", e)
            })?;
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT id, start_time, last_activity, label FROM sessions ORDER BY start_time DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list sessions", e))
    }
}
