//! PostgreSQL pool for the slot, session, settings and timeout tables.
//!
//! Every connection carries a server-side `statement_timeout` equal to
//! `database.statement_timeout_ms`, so a query abandoned by the admission
//! engine is also cancelled by the server.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::info;

use slotbot_core::config::DatabaseConfig;
use slotbot_core::error::{AppError, ErrorKind};
use slotbot_core::result::AppResult;

/// Name reported in `pg_stat_activity`.
const APPLICATION_NAME: &str = "slotbot";

/// Shared handle to the PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open the pool described by `config`.
    ///
    /// Failure here is a configuration error: the server refuses to start
    /// without its stores.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let options = connect_options(config)?;
        info!(
            host = options.get_host(),
            port = options.get_port(),
            database = options.get_database().unwrap_or_default(),
            user = options.get_username(),
            max_connections = config.max_connections,
            statement_timeout_ms = config.statement_timeout_ms,
            "Opening PostgreSQL pool"
        );

        let pool = pool_options(config)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("PostgreSQL unreachable: {e}"),
                    e,
                )
            })?;

        info!(size = pool.size(), "PostgreSQL pool ready");
        Ok(Self { pool })
    }

    /// The sqlx pool the repositories run on.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// `true` when a trivial query round-trips.
    pub async fn health_check(&self) -> AppResult<bool> {
        let one: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))?;
        Ok(one == 1)
    }

    /// Wait for checked-out connections and close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}

/// Parse the URL and attach per-connection session settings.
fn connect_options(config: &DatabaseConfig) -> AppResult<PgConnectOptions> {
    if config.url.trim().is_empty() {
        return Err(AppError::configuration(
            "database.url is required for the postgres provider",
        ));
    }
    let options = PgConnectOptions::from_str(&config.url).map_err(|e| {
        AppError::with_source(ErrorKind::Configuration, "Invalid database.url", e)
    })?;
    Ok(options
        .application_name(APPLICATION_NAME)
        .options([("statement_timeout", config.statement_timeout_ms.to_string())]))
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
}
