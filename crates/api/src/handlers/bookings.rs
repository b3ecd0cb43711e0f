//! Handlers for reservations.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sunin_core::models::booking::{CreateBooking, UpdateBooking};
use sunin_core::types::DbId;

use crate::error::AppResult;
use crate::query::BookingListParams;
use crate::state::AppState;

/// GET /api/bookings?search=&from=&to=&roomId=
///
/// Bookings joined with their room, ordered by check-in.
pub async fn list_bookings(
    State(state): State<AppState>,
    params: Result<Query<BookingListParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params?;
    let filter = params.into_filter(state.ledger.calendar())?;
    let bookings = state.ledger.list_bookings(&filter).await?;
    Ok(Json(bookings))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;
    let booking = state.ledger.get_booking(id).await?;
    Ok(Json(booking))
}

/// POST /api/bookings
///
/// 400 `INVALID_INTERVAL` / `ROOM_NOT_FOUND` / `VALIDATION_ERROR`,
/// 409 `DOUBLE_BOOKED` when the nights overlap an existing stay.
pub async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<CreateBooking>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let booking = state.ledger.create_booking(input, chrono::Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// PUT /api/bookings/{id}
pub async fn update_booking(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<UpdateBooking>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let booking = state.ledger.update_booking(id, input).await?;
    Ok(Json(booking))
}

/// DELETE /api/bookings/{id}
pub async fn delete_booking(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id?;
    state.ledger.delete_booking(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
