//! Hotel settings singleton.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use sunin_core::models::settings::UpdateSettings;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/settings
///
/// Creates and persists the defaults on first access.
pub async fn get_settings(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let settings = state.ledger.settings().await?;
    Ok(Json(settings))
}

/// PATCH|PUT /api/settings
pub async fn update_settings(
    State(state): State<AppState>,
    payload: Result<Json<UpdateSettings>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let settings = state.ledger.update_settings(input).await?;
    Ok(Json(settings))
}
