//! Session listing.

use axum::Json;
use axum::extract::State;

use slotbot_entity::session::Session;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/sessions
pub async fn list_sessions(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<Session>>>> {
    let sessions = state.services.sessions.list().await?;
    Ok(Json(ApiResponse::ok(sessions)))
}
