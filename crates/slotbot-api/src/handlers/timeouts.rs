//! Timeout registry handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use slotbot_entity::timeout::Timeout;

use crate::dto::request::CreateTimeoutRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{ValidJson, parse_uuid};
use crate::state::AppState;

/// GET /api/timeouts
pub async fn list_timeouts(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<Timeout>>>> {
    let active = state.services.timeouts.list_active().await?;
    Ok(Json(ApiResponse::ok(active)))
}

/// POST /api/timeouts
pub async fn create_timeout(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateTimeoutRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Timeout>>)> {
    let timeout = state.services.timeouts.add(&req.user, req.duration).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(timeout))))
}

/// DELETE /api/timeouts/{id}
pub async fn delete_timeout(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_uuid(&id)?;
    state.services.timeouts.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
