//! The persistence port: whole-state load and atomic commit.
//!
//! Adapters (flat file, PostgreSQL, in-memory) live in `sunin-db`. The
//! ledger depends only on this trait.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::state::HotelState;

/// Failure to read or durably write state.
///
/// Stored data that is not a JSON document is not an error: adapters
/// quarantine it and resume from an empty state. A document that parses but
/// whose records don't fit the model is [`StorageError::Decode`] and is left
/// where it is.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Stored data at {path} does not fit the hotel model: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        StorageError::Backend(Box::new(err))
    }
}

#[async_trait]
pub trait PersistencePort: Send + Sync {
    /// The last successfully committed state, or an empty default.
    async fn load(&self) -> Result<HotelState, StorageError>;

    /// Replace the stored state all-or-nothing. On error the previously
    /// committed state stays intact and visible to the next `load`.
    async fn commit(&self, state: &HotelState) -> Result<(), StorageError>;

    /// Short description for logs (`file:/var/lib/...`, `postgres`).
    fn describe(&self) -> String;
}
