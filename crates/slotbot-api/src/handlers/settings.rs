//! Settings read and update.

use axum::Json;
use axum::extract::State;

use slotbot_entity::settings::{Settings, SettingsPatch};

use crate::dto::request::UpdateSettingsRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::ValidJson;
use crate::state::AppState;

/// GET /api/settings
pub async fn get_settings(State(state): State<AppState>) -> Json<ApiResponse<Settings>> {
    let current = state.services.settings.current();
    Json(ApiResponse::ok(Settings::clone(&current)))
}

/// PATCH /api/settings
pub async fn update_settings(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<UpdateSettingsRequest>,
) -> ApiResult<Json<ApiResponse<Settings>>> {
    let updated = state
        .services
        .settings
        .update(&SettingsPatch::from(req))
        .await?;
    Ok(Json(ApiResponse::ok(Settings::clone(&updated))))
}
