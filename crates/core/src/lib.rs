//! Sunin hotel booking ledger: domain rules with no HTTP or SQL.
//!
//! - [`Ledger`] serializes every mutation over a [`PersistencePort`].
//! - [`availability`] and [`pricing`] implement the half-open night model.
//! - [`HotelState`] is the whole persisted document.

pub mod availability;
pub mod calendar;
pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod ledger;
pub mod models;
pub mod money;
pub mod occupancy;
pub mod port;
pub mod pricing;
pub mod reservations;
pub mod search;
pub mod state;
pub mod types;
pub mod validation;

pub use calendar::Calendar;
pub use error::CoreError;
pub use ledger::Ledger;
pub use port::{PersistencePort, StorageError};
pub use state::HotelState;
