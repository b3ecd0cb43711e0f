use crate::port::StorageError;
use crate::types::DbId;

/// Domain error taxonomy shared by every ledger operation.
///
/// Request-scoped failures (validation, missing entities, conflicts) are
/// raised before any state is mutated, so a rejected request never leaves a
/// partial commit behind.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Check-out must be after check-in")]
    InvalidInterval,

    /// A booking references a room that does not exist.
    #[error("Room {id} does not exist")]
    RoomNotFound { id: DbId },

    #[error("Room {room_id} is already booked for these dates")]
    DoubleBooked {
        room_id: DbId,
        conflicting: Vec<DbId>,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(crate::validation::describe(&errors))
    }
}
