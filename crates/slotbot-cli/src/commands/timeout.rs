//! Timeout commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use slotbot_core::config::AppConfig;
use slotbot_core::error::AppError;
use slotbot_core::result::AppResult;

use crate::output::{self, OutputFormat};

/// Arguments for timeout commands
#[derive(Debug, Args)]
pub struct TimeoutArgs {
    /// Timeout subcommand
    #[command(subcommand)]
    pub command: TimeoutCommand,
}

/// Timeout subcommands
#[derive(Debug, Subcommand)]
pub enum TimeoutCommand {
    /// Time a user out
    Add {
        /// Username
        user: String,
        /// Duration in minutes
        minutes: f64,
    },
    /// List active timeouts
    List,
    /// Lift a timeout
    Remove {
        /// Timeout ID
        id: String,
    },
}

/// Timeout display row
#[derive(Debug, Serialize, Tabled)]
struct TimeoutRow {
    id: String,
    user: String,
    expires: String,
}

/// Execute timeout commands
pub async fn execute(args: &TimeoutArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let services = super::build_services(config).await?;

    match &args.command {
        TimeoutCommand::Add { user, minutes } => {
            let timeout = services.timeouts.add(user, *minutes).await?;
            output::print_success(&format!(
                "{} timed out until {}",
                timeout.user,
                timeout.expires_at.format("%Y-%m-%d %H:%M:%S")
            ));
        }
        TimeoutCommand::List => {
            let rows: Vec<TimeoutRow> = services
                .timeouts
                .list_active()
                .await?
                .into_iter()
                .map(|t| TimeoutRow {
                    id: t.id.to_string(),
                    user: t.user,
                    expires: t.expires_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        TimeoutCommand::Remove { id } => {
            let id = uuid::Uuid::parse_str(id)
                .map_err(|_| AppError::validation(format!("Invalid id: {id}")))?;
            services.timeouts.remove(id).await?;
            output::print_success("Timeout removed.");
        }
    }

    Ok(())
}
