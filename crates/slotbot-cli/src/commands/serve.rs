//! Start the SlotBot server.

use clap::Args;

use slotbot_core::config::AppConfig;
use slotbot_core::result::AppResult;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Log replies instead of posting them to chat
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> AppResult<()> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if args.dry_run {
        config.chat.outbound = "log".to_string();
    }

    println!("Starting SlotBot server...");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);
    println!("  Replies: {}", config.chat.outbound);

    slotbot_api::run_server(config).await
}
