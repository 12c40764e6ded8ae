//! Leaderboard handler.

use axum::Json;
use axum::extract::{Query, State};

use crate::dto::request::LeaderboardQuery;
use crate::dto::response::{ApiResponse, LeaderboardResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/leaderboard?period=daily|weekly|monthly
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> ApiResult<Json<ApiResponse<LeaderboardResponse>>> {
    let period = query.period()?;
    let entries = state.services.leaderboard.ranking(period).await?;
    Ok(Json(ApiResponse::ok(LeaderboardResponse { period, entries })))
}
