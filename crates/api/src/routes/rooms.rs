use axum::routing::get;
use axum::Router;

use crate::handlers::rooms;
use crate::state::AppState;

/// Room routes mounted at `/rooms`.
///
/// ```text
/// GET    /        -> list_rooms
/// POST   /        -> create_room
/// GET    /{id}    -> get_room
/// PUT    /{id}    -> update_room
/// DELETE /{id}    -> delete_room
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(rooms::list_rooms).post(rooms::create_room))
        .route(
            "/{id}",
            get(rooms::get_room)
                .put(rooms::update_room)
                .delete(rooms::delete_room),
        )
}
