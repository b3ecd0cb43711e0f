use std::sync::Arc;

use sunin_core::Ledger;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The booking ledger; owns the storage adapter and the hotel calendar.
    pub ledger: Arc<Ledger>,
    pub config: Arc<ServerConfig>,
}
