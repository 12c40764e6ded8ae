//! CLI command definitions and dispatch.

pub mod leaderboard;
pub mod migrate;
pub mod serve;
pub mod sessions;
pub mod settings;
pub mod timeout;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use slotbot_core::config::AppConfig;
use slotbot_core::result::AppResult;
use slotbot_core::traits::SystemClock;
use slotbot_database::Stores;
use slotbot_realtime::BroadcastHub;
use slotbot_service::Services;

use crate::output::OutputFormat;

/// SlotBot: chat slot queue administration
#[derive(Debug, Parser)]
#[command(name = "slotbot", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and per-environment overrides
    #[arg(short, long, default_value = "config")]
    pub config: String,

    /// Environment overlay to load (config/<env>.toml)
    #[arg(short, long, env = "SLOTBOT_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the SlotBot server
    Serve(serve::ServeArgs),
    /// Apply database migrations
    Migrate,
    /// List sessions, newest first
    Sessions,
    /// Show a leaderboard
    Leaderboard(leaderboard::LeaderboardArgs),
    /// Admission settings
    Settings(settings::SettingsArgs),
    /// Timeout registry
    Timeout(timeout::TimeoutArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> AppResult<()> {
        let config = AppConfig::load_from(&self.config, &self.env)?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate => migrate::execute(&config).await,
            Commands::Sessions => sessions::execute(&config, self.format).await,
            Commands::Leaderboard(args) => leaderboard::execute(args, &config, self.format).await,
            Commands::Settings(args) => settings::execute(args, &config, self.format).await,
            Commands::Timeout(args) => timeout::execute(args, &config, self.format).await,
        }
    }
}

/// Helper: build the service bundle against the configured stores
pub async fn build_services(config: &AppConfig) -> AppResult<Services> {
    let stores = Stores::from_config(&config.database).await?;
    Services::build(
        config,
        stores,
        BroadcastHub::from_config(&config.realtime),
        Arc::new(SystemClock),
        None,
    )
    .await
}
