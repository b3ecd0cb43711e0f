//! Handlers for the room catalog.
//!
//! Room responses carry a derived `displayStatus`; `Occupied` is never
//! accepted as input.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sunin_core::models::room::{CreateRoom, UpdateRoom};
use sunin_core::types::DbId;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/rooms
pub async fn list_rooms(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rooms = state.ledger.list_rooms(chrono::Utc::now()).await?;
    Ok(Json(rooms))
}

/// GET /api/rooms/{id}
pub async fn get_room(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;
    let room = state.ledger.get_room(id, chrono::Utc::now()).await?;
    Ok(Json(room))
}

/// POST /api/rooms
pub async fn create_room(
    State(state): State<AppState>,
    payload: Result<Json<CreateRoom>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let room = state.ledger.create_room(input, chrono::Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// PUT /api/rooms/{id}
///
/// Partial update; absent fields keep their current value.
pub async fn update_room(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<UpdateRoom>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let room = state.ledger.update_room(id, input, chrono::Utc::now()).await?;
    Ok(Json(room))
}

/// DELETE /api/rooms/{id}
///
/// Cascades to the room's bookings. Unknown ids still return 204.
pub async fn delete_room(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id?;
    state.ledger.delete_room(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
