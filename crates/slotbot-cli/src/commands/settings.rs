//! Settings commands.

use clap::{Args, Subcommand};

use slotbot_core::config::AppConfig;
use slotbot_core::result::AppResult;

use crate::output::{self, OutputFormat};

/// Arguments for settings commands
#[derive(Debug, Args)]
pub struct SettingsArgs {
    /// Settings subcommand
    #[command(subcommand)]
    pub command: SettingsCommand,
}

/// Settings subcommands
#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show the stored settings
    Show,
}

/// Execute settings commands
pub async fn execute(args: &SettingsArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let services = super::build_services(config).await?;

    match &args.command {
        SettingsCommand::Show => {
            let settings = services.settings.current();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&*settings)?),
                OutputFormat::Table => {
                    println!("Admission settings:");
                    output::print_kv("Limits enabled", &settings.enabled.to_string());
                    output::print_kv("Follower limit", &settings.follower_limit.to_string());
                    output::print_kv("Subscriber limit", &settings.subscriber_limit.to_string());
                    output::print_kv("VIP limit", &settings.vip_limit.to_string());
                    output::print_kv("Moderator limit", &settings.moderator_limit.to_string());
                    output::print_kv(
                        "OUT cooldown (min)",
                        &settings.out_cooldown_minutes.to_string(),
                    );
                }
            }
        }
    }

    Ok(())
}
