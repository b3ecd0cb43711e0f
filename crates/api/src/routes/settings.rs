use axum::routing::get;
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Settings routes mounted at `/settings`.
///
/// ```text
/// GET    /    -> get_settings
/// PATCH  /    -> update_settings
/// PUT    /    -> update_settings
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(settings::get_settings)
            .patch(settings::update_settings)
            .put(settings::update_settings),
    )
}
