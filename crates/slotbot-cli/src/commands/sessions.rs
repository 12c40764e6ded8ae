//! Session listing command.

use serde::Serialize;
use tabled::Tabled;

use slotbot_core::config::AppConfig;
use slotbot_core::result::AppResult;

use crate::output::{self, OutputFormat};

/// Session display row
#[derive(Debug, Serialize, Tabled)]
struct SessionRow {
    id: String,
    label: String,
    started: String,
    last_activity: String,
}

/// List sessions
pub async fn execute(config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let services = super::build_services(config).await?;
    let sessions = services.sessions.list().await?;

    let rows: Vec<SessionRow> = sessions
        .iter()
        .map(|s| SessionRow {
            id: s.id.to_string(),
            label: s.label.clone(),
            started: s.start_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            last_activity: s.last_activity.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    output::print_list(&rows, format);
    Ok(())
}
