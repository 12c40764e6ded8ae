//! Leaderboard command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use slotbot_core::config::AppConfig;
use slotbot_core::result::AppResult;
use slotbot_core::types::LeaderboardPeriod;

use crate::output::{self, OutputFormat};

/// Arguments for the leaderboard command
#[derive(Debug, Args)]
pub struct LeaderboardArgs {
    /// daily, weekly or monthly
    #[arg(value_parser = parse_period)]
    pub period: LeaderboardPeriod,

    /// Show only the first N users
    #[arg(short, long)]
    pub limit: Option<usize>,
}

fn parse_period(raw: &str) -> Result<LeaderboardPeriod, String> {
    raw.parse().map_err(|e: slotbot_core::error::AppError| e.message)
}

/// Ranking display row
#[derive(Debug, Serialize, Tabled)]
struct RankRow {
    rank: usize,
    user: String,
    played: u32,
}

/// Show the ranking
pub async fn execute(args: &LeaderboardArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let services = super::build_services(config).await?;
    let entries = match args.limit {
        Some(n) => services.leaderboard.top(args.period, n).await?,
        None => services.leaderboard.ranking(args.period).await?,
    };

    let rows: Vec<RankRow> = entries
        .into_iter()
        .enumerate()
        .map(|(i, e)| RankRow {
            rank: i + 1,
            user: e.user,
            played: e.count,
        })
        .collect();

    output::print_list(&rows, format);
    Ok(())
}
