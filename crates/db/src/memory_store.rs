//! In-process adapter for tests and throwaway runs.

use std::sync::Mutex;

use async_trait::async_trait;
use sunin_core::port::{PersistencePort, StorageError};
use sunin_core::HotelState;

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<HotelState>,
}

impl MemoryStore {
    pub fn with_state(state: HotelState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

#[async_trait]
impl PersistencePort for MemoryStore {
    async fn load(&self) -> Result<HotelState, StorageError> {
        Ok(self.state.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    async fn commit(&self, state: &HotelState) -> Result<(), StorageError> {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state.clone();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
