//! Demo data for an empty hotel.

use chrono::Duration;
use sunin_core::models::booking::{BookingStatus, CreateBooking, PaymentStatus};
use sunin_core::models::room::CreateRoom;
use sunin_core::money::Currency;
use sunin_core::types::{DbId, Timestamp};
use sunin_core::{CoreError, Ledger};

/// (room number, type, status, nightly price in Kip)
const DEMO_ROOMS: &[(&str, &str, &str, i64)] = &[
    ("101", "Standard", "Available", 250_000),
    ("102", "Standard", "Available", 250_000),
    ("103", "Standard", "Maintenance", 250_000),
    ("201", "Deluxe", "Available", 450_000),
    ("202", "Deluxe", "Available", 450_000),
    ("301", "VIP", "Available", 850_000),
];

/// Seed six rooms and two checked-in bookings if the catalog is empty.
///
/// Returns whether anything was written.
pub async fn seed_demo_data(ledger: &Ledger, now: Timestamp) -> Result<bool, CoreError> {
    if !ledger.snapshot().await?.rooms.is_empty() {
        tracing::debug!("Room catalog not empty, skipping demo seed");
        return Ok(false);
    }

    let mut room_ids: Vec<(&str, DbId)> = Vec::with_capacity(DEMO_ROOMS.len());
    for (number, room_type, status, price) in DEMO_ROOMS {
        let room = ledger
            .create_room(
                CreateRoom {
                    room_number: (*number).to_string(),
                    room_type: (*room_type).to_string(),
                    status: Some((*status).to_string()),
                    price: Some(*price),
                    currency: Some(Currency::Local),
                },
                now,
            )
            .await?;
        room_ids.push((*number, room.room.id));
    }
    let room_id = |number: &str| {
        room_ids
            .iter()
            .find(|(n, _)| *n == number)
            .map(|(_, id)| *id)
            .ok_or_else(|| CoreError::Internal(format!("Demo room {number} missing")))
    };

    let demo_bookings = [
        (
            "John Doe",
            "555-0101",
            room_id("101")?,
            Duration::days(1),
            250_000,
            PaymentStatus::Unpaid,
        ),
        (
            "Alice Smith",
            "555-0102",
            room_id("201")?,
            Duration::days(7),
            3_150_000,
            PaymentStatus::Paid,
        ),
    ];
    let booking_count = demo_bookings.len();
    for (guest, phone, room_id, stay, total, payment_status) in demo_bookings {
        ledger
            .create_booking(
                CreateBooking {
                    guest_name: guest.to_string(),
                    phone: phone.to_string(),
                    room_id,
                    check_in: now,
                    check_out: now + stay,
                    status: Some(BookingStatus::CheckedIn),
                    payment_status: Some(payment_status),
                    total_price: Some(total),
                    discount_amount: None,
                    notes: None,
                    invoice_number: None,
                    identification: None,
                },
                now,
            )
            .await?;
    }

    tracing::info!(
        rooms = DEMO_ROOMS.len(),
        bookings = booking_count,
        "Seeded demo data"
    );
    Ok(true)
}
