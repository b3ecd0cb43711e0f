//! Reservation records and their request DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::calendar::flexible;
use crate::models::room::Room;
use crate::money::Currency;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

/// Guest lifecycle, independent of the booked dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    #[default]
    #[serde(rename = "reserved")]
    Reserved,
    #[serde(rename = "checked in", alias = "checked-in", alias = "checked_in")]
    CheckedIn,
    #[serde(rename = "checked out", alias = "checked-out", alias = "checked_out")]
    CheckedOut,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    #[default]
    Unpaid,
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A persisted reservation.
///
/// `total_price` is a snapshot in the stored units of `currency`; it is not
/// re-derived when the room's rate changes later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: DbId,
    #[validate(custom(function = "crate::validation::non_blank"))]
    pub guest_name: String,
    #[validate(custom(function = "crate::validation::non_blank"))]
    pub phone: String,
    pub room_id: DbId,
    pub check_in: Timestamp,
    pub check_out: Timestamp,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[validate(range(min = 0, message = "totalPrice must not be negative"))]
    pub total_price: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "discountAmount must not be negative"))]
    pub discount_amount: i64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub identification: Option<String>,
    pub created_at: Timestamp,
}

/// A booking joined with the room it references.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingWithRoom {
    #[serde(flatten)]
    pub booking: Booking,
    pub room: Room,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Payload for a new booking. A missing or non-positive `total_price` is
/// computed from the room's nightly rate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    pub guest_name: String,
    pub phone: String,
    pub room_id: DbId,
    #[serde(deserialize_with = "flexible::deserialize")]
    pub check_in: Timestamp,
    #[serde(deserialize_with = "flexible::deserialize")]
    pub check_out: Timestamp,
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, deserialize_with = "super::lenient::option_i64")]
    pub total_price: Option<i64>,
    #[serde(default, deserialize_with = "super::lenient::option_i64")]
    pub discount_amount: Option<i64>,
    pub notes: Option<String>,
    pub invoice_number: Option<String>,
    pub identification: Option<String>,
}

/// Partial update. Absent fields keep their current value; an empty string
/// clears an optional text field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBooking {
    pub guest_name: Option<String>,
    pub phone: Option<String>,
    pub room_id: Option<DbId>,
    #[serde(default, deserialize_with = "flexible::deserialize_option")]
    pub check_in: Option<Timestamp>,
    #[serde(default, deserialize_with = "flexible::deserialize_option")]
    pub check_out: Option<Timestamp>,
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, deserialize_with = "super::lenient::option_i64")]
    pub total_price: Option<i64>,
    #[serde(default, deserialize_with = "super::lenient::option_i64")]
    pub discount_amount: Option<i64>,
    pub notes: Option<String>,
    pub invoice_number: Option<String>,
    pub identification: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_status_uses_client_spelling() {
        assert_eq!(serde_json::to_value(BookingStatus::CheckedIn).unwrap(), "checked in");
        let parsed: BookingStatus = serde_json::from_str("\"checked-out\"").unwrap();
        assert_eq!(parsed, BookingStatus::CheckedOut);
    }

    #[test]
    fn create_payload_accepts_naive_times_and_string_prices() {
        let input: CreateBooking = serde_json::from_value(serde_json::json!({
            "guestName": "A",
            "phone": "555",
            "roomId": 1,
            "checkIn": "2024-01-10T14:00",
            "checkOut": "2024-01-12T11:00:00Z",
            "totalPrice": "500000"
        }))
        .unwrap();
        assert_eq!(input.total_price, Some(500_000));
        assert_eq!(input.check_in.to_rfc3339(), "2024-01-10T14:00:00+00:00");
        assert_eq!(input.discount_amount, None);
    }

    #[test]
    fn update_payload_is_fully_optional() {
        let input: UpdateBooking = serde_json::from_str(r#"{"notes":"late arrival"}"#).unwrap();
        assert_eq!(input.notes.as_deref(), Some("late arrival"));
        assert!(input.check_in.is_none());
        assert!(input.total_price.is_none());
    }
}
