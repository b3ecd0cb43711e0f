pub mod bookings;
pub mod dashboard;
pub mod health;
pub mod rooms;
pub mod settings;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /rooms                 list, create
/// /rooms/{id}            get, update, delete (cascades bookings)
///
/// /bookings              list (?search&from&to&roomId), create
/// /bookings/{id}         get, update, delete
///
/// /dashboard/stats       occupancy statistics for today
///
/// /settings              get, update (PATCH or PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/rooms", rooms::router())
        .nest("/bookings", bookings::router())
        .nest("/dashboard", dashboard::router())
        .nest("/settings", settings::router())
}
