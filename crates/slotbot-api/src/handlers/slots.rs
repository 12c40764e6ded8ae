//! Slot listing and operator edits.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use slotbot_entity::slot::Slot;

use crate::dto::request::{SlotQuery, UpdateSlotRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{ValidJson, parse_uuid};
use crate::state::AppState;

/// GET /api/slots?session_id&status&user&start_date&end_date
pub async fn list_slots(
    State(state): State<AppState>,
    Query(query): Query<SlotQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Slot>>>> {
    let filter = query.into_filter()?;
    let slots = state.services.slots.list(&filter).await?;
    Ok(Json(ApiResponse::ok(slots)))
}

/// PATCH /api/slots/{id}
pub async fn update_slot(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateSlotRequest>,
) -> ApiResult<StatusCode> {
    let id = parse_uuid(&id)?;
    let update = req.into_update()?;
    state.services.slots.update(id, update).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/slots/{id}
pub async fn delete_slot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_uuid(&id)?;
    state.services.slots.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
