//! Store bundle selected by configuration.

use std::sync::Arc;

use tracing::info;

use slotbot_core::config::DatabaseConfig;
use slotbot_core::error::AppError;
use slotbot_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryDatabase;
use crate::migration::run_migrations;
use crate::repositories::{
    PgSessionRepository, PgSettingsRepository, PgSlotRepository, PgTimeoutRepository,
    SessionStore, SettingsStore, SlotStore, TimeoutStore,
};

/// Handles to every store, shared across services.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Slot records.
    pub slots: Arc<dyn SlotStore>,
    /// Session records.
    pub sessions: Arc<dyn SessionStore>,
    /// Settings singleton.
    pub settings: Arc<dyn SettingsStore>,
    /// Timeout records.
    pub timeouts: Arc<dyn TimeoutStore>,
    /// The PostgreSQL pool, when that provider is in use.
    pub pool: Option<DatabasePool>,
}

impl Stores {
    /// Build the stores named by `config.provider`.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "postgres" => {
                info!("Initializing PostgreSQL stores");
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(pool.pool()).await?;
                }
                Ok(Self::postgres(pool))
            }
            "memory" => {
                info!("Initializing in-memory stores");
                Ok(Self::memory(MemoryDatabase::new()))
            }
            other => Err(AppError::configuration(format!(
                "Unknown database provider: '{other}'. Supported: postgres, memory"
            ))),
        }
    }

    /// Stores backed by a PostgreSQL pool.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            slots: Arc::new(PgSlotRepository::new(pg.clone())),
            sessions: Arc::new(PgSessionRepository::new(pg.clone())),
            settings: Arc::new(PgSettingsRepository::new(pg.clone())),
            timeouts: Arc::new(PgTimeoutRepository::new(pg)),
            pool: Some(pool),
        }
    }

    /// Stores backed by one shared in-memory database.
    pub fn memory(db: MemoryDatabase) -> Self {
        Self {
            slots: Arc::new(db.clone()),
            sessions: Arc::new(db.clone()),
            settings: Arc::new(db.clone()),
            timeouts: Arc::new(db),
            pool: None,
        }
    }

    /// Check the backing store is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }
}
