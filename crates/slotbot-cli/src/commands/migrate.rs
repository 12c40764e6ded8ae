//! Database migration command.

use slotbot_core::config::AppConfig;
use slotbot_core::error::AppError;
use slotbot_core::result::AppResult;
use slotbot_database::DatabasePool;
use slotbot_database::migration::run_migrations;

use crate::output;

/// Apply all pending migrations
pub async fn execute(config: &AppConfig) -> AppResult<()> {
    if config.database.provider != "postgres" {
        return Err(AppError::configuration(format!(
            "Migrations need the postgres provider, configured: '{}'",
            config.database.provider
        )));
    }

    println!("Running database migrations...");
    let pool = DatabasePool::connect(&config.database).await?;
    run_migrations(pool.pool()).await?;
    pool.close().await;
    output::print_success("All migrations applied successfully.");
    Ok(())
}
