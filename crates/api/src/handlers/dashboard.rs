use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/dashboard/stats
pub async fn stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = state.ledger.dashboard(chrono::Utc::now()).await?;
    Ok(Json(stats))
}
