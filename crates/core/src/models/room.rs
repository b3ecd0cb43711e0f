//! Room catalog records.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::money::{Currency, Money};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Operator-settable room state. Occupancy is never stored; see
/// [`DisplayStatus`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomStatus {
    /// Legacy documents may carry `"Occupied"`; it is read back as available
    /// because occupancy is derived from bookings.
    #[default]
    #[serde(alias = "Occupied")]
    Available,
    Maintenance,
}

impl RoomStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            RoomStatus::Available => "Available",
            RoomStatus::Maintenance => "Maintenance",
        }
    }
}

/// Status shown to operators: the stored status, overridden by `Occupied`
/// while a checked-in guest holds the room today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisplayStatus {
    Available,
    Maintenance,
    Occupied,
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: DbId,
    pub room_number: String,
    #[serde(rename = "type")]
    pub room_type: String,
    #[serde(default)]
    pub status: RoomStatus,
    /// Nightly rate in the currency's stored units.
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub currency: Currency,
}

impl Room {
    pub fn nightly_rate(&self) -> Money {
        Money::new(self.price, self.currency)
    }
}

/// A room together with its derived display status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    #[serde(flatten)]
    pub room: Room,
    pub display_status: DisplayStatus,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoom {
    #[validate(custom(function = "crate::validation::non_blank"))]
    pub room_number: String,
    #[serde(rename = "type")]
    #[validate(custom(function = "crate::validation::non_blank"))]
    pub room_type: String,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::option_i64")]
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: Option<i64>,
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoom {
    #[validate(custom(function = "crate::validation::non_blank"))]
    pub room_number: Option<String>,
    #[serde(rename = "type")]
    #[validate(custom(function = "crate::validation::non_blank"))]
    pub room_type: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::option_i64")]
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: Option<i64>,
    pub currency: Option<Currency>,
}
