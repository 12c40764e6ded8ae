//! Slot repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use slotbot_core::error::{AppError, ErrorKind};
use slotbot_core::result::AppResult;
use slotbot_entity::slot::{NewSlot, Slot, SlotFilter, SlotPatch, StatusFilter};

use super::SlotStore;

const SLOT_COLUMNS: &str = "id, session_id, time, local_date, user_name, message, subscriber, vip, \
     moderator, status, payout, out_count, status_changed_at, cooldown_expires_at";

/// PostgreSQL-backed slot store.
#[derive(Debug, Clone)]
pub struct PgSlotRepository {
    pool: PgPool,
}

impl PgSlotRepository {
    /// Create a new slot repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlotStore for PgSlotRepository {
    async fn insert(&self, slot: NewSlot) -> AppResult<Slot> {
        let sql = format!(
            "INSERT INTO slots (id, session_id, time, local_date, user_name, message, subscriber, vip, moderator) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {SLOT_COLUMNS}"
        );
        sqlx::query_as::<_, Slot>(&sql)
            .bind(Uuid::new_v4())
            .bind(slot.session_id)
            .bind(slot.time)
            .bind(slot.local_date)
            .bind(&slot.user)
            .bind(&slot.message)
            .bind(slot.badges.subscriber)
            .bind(slot.badges.vip)
            .bind(slot.badges.moderator)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert slot", e))
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Slot>> {
        let sql = format!("SELECT {SLOT_COLUMNS} FROM slots WHERE id = $1");
        sqlx::query_as::<_, Slot>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find slot", e))
    }

    async fn find(&self, filter: &SlotFilter) -> AppResult<Vec<Slot>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if filter.session_id.is_some() {
            conditions.push(format!("session_id = ${param_idx}"));
            param_idx += 1;
        }
        if filter.user.is_some() {
            conditions.push(format!("user_name = ${param_idx}"));
            param_idx += 1;
        }
        match filter.status {
            Some(StatusFilter::Unset) => conditions.push("status IS NULL".to_string()),
            Some(_) => {
                conditions.push(format!("status = ${param_idx}"));
                param_idx += 1;
            }
            None => {}
        }
        if filter.message.is_some() {
            conditions.push(format!("message = ${param_idx}"));
            param_idx += 1;
        }
        if filter.time_from.is_some() {
            conditions.push(format!("time >= ${param_idx}"));
            param_idx += 1;
        }
        if filter.time_to.is_some() {
            conditions.push(format!("time <= ${param_idx}"));
            param_idx += 1;
        }
        if filter.date_from.is_some() {
            conditions.push(format!("local_date >= ${param_idx}"));
            param_idx += 1;
        }
        if filter.date_to.is_some() {
            conditions.push(format!("local_date <= ${param_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!("SELECT {SLOT_COLUMNS} FROM slots {where_clause} ORDER BY time ASC, id ASC");

        let mut query = sqlx::query_as::<_, Slot>(&sql);
        if let Some(session_id) = filter.session_id {
            query = query.bind(session_id);
        }
        if let Some(user) = &filter.user {
            query = query.bind(user.clone());
        }
        if let Some(status) = filter.status.and_then(|s| s.as_status()) {
            query = query.bind(status);
        }
        if let Some(message) = &filter.message {
            query = query.bind(message.clone());
        }
        if let Some(from) = filter.time_from {
            query = query.bind(from);
        }
        if let Some(to) = filter.time_to {
            query = query.bind(to);
        }
        if let Some(from) = filter.date_from {
            query = query.bind(from);
        }
        if let Some(to) = filter.date_to {
            query = query.bind(to);
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search slots", e))
    }

    async fn latest_by_message(&self, session_id: Uuid, message: &str) -> AppResult<Option<Slot>> {
        let sql = format!(
            "SELECT {SLOT_COLUMNS} FROM slots WHERE session_id = $1 AND message = $2 \
             ORDER BY time DESC LIMIT 1"
        );
        sqlx::query_as::<_, Slot>(&sql)
            .bind(session_id)
            .bind(message)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find slot by message", e)
            })
    }

    async fn count_by_user(&self, session_id: Uuid, user: &str) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM slots WHERE session_id = $1 AND user_name = $2",
        )
        .bind(session_id)
        .bind(user)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count user slots", e))
    }

    async fn update(&self, id: Uuid, patch: &SlotPatch) -> AppResult<Option<Slot>> {
        let sql = format!(
            "UPDATE slots SET \
                status = COALESCE($2, status), \
                payout = COALESCE($3, payout), \
                message = COALESCE($4, message), \
                status_changed_at = COALESCE($5, status_changed_at), \
                cooldown_expires_at = $6, \
                out_count = out_count + $7 \
             WHERE id = $1 RETURNING {SLOT_COLUMNS}"
        );
        sqlx::query_as::<_, Slot>(&sql)
            .bind(id)
            .bind(patch.status)
            .bind(patch.payout)
            .bind(patch.message.as_deref())
            .bind(patch.status_changed_at)
            .bind(patch.cooldown_expires_at)
            .bind(i32::from(patch.increment_out_count))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update slot", e))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM slots WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete slot", e))?;
        Ok(result.rows_affected() > 0)
    }
}
