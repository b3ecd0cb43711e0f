//! Booking rules: the only code that mutates bookings.
//!
//! Create and update both build a complete candidate [`Booking`] and pass it
//! through [`admit`], so validation cannot drift between the two paths.
//! Everything runs against an in-memory [`HotelState`]; nothing is mutated
//! until the candidate has been admitted.

use validator::Validate;

use crate::availability::{find_conflicts, StayRequest};
use crate::calendar::Calendar;
use crate::error::CoreError;
use crate::models::booking::{Booking, BookingWithRoom, CreateBooking, UpdateBooking};
use crate::models::room::Room;
use crate::pricing;
use crate::search::BookingFilter;
use crate::state::HotelState;
use crate::types::{DbId, Timestamp};
use crate::validation::{optional_text, validate_interval};

/// Check a fully merged candidate against every booking invariant.
///
/// Order: field rules, interval, room reference, availability (excluding
/// `exclude`), invoice number uniqueness. Returns the referenced room.
pub fn admit<'s>(
    state: &'s HotelState,
    calendar: &Calendar,
    candidate: &Booking,
    exclude: Option<DbId>,
) -> Result<&'s Room, CoreError> {
    candidate.validate()?;
    validate_interval(candidate.check_in, candidate.check_out)?;
    let room = state
        .room(candidate.room_id)
        .ok_or(CoreError::RoomNotFound {
            id: candidate.room_id,
        })?;

    let request = StayRequest {
        room_id: candidate.room_id,
        check_in: candidate.check_in,
        check_out: candidate.check_out,
        exclude,
    };
    let conflicting = find_conflicts(calendar, &state.bookings, &request);
    if !conflicting.is_empty() {
        return Err(CoreError::DoubleBooked {
            room_id: candidate.room_id,
            conflicting,
        });
    }

    if let Some(invoice) = candidate.invoice_number.as_deref() {
        let taken = state
            .bookings
            .iter()
            .any(|b| Some(b.id) != exclude && b.invoice_number.as_deref() == Some(invoice));
        if taken {
            return Err(CoreError::Conflict(format!(
                "Invoice number '{invoice}' is already in use"
            )));
        }
    }

    Ok(room)
}

/// Admit and insert a new booking. A missing or non-positive `total_price`
/// is computed from the room rate with the requested discount netted in.
pub fn create_booking(
    state: &mut HotelState,
    calendar: &Calendar,
    input: CreateBooking,
    now: Timestamp,
) -> Result<BookingWithRoom, CoreError> {
    let supplied_total = input.total_price.filter(|total| *total > 0);
    let mut candidate = Booking {
        id: 0,
        guest_name: input.guest_name.trim().to_string(),
        phone: input.phone.trim().to_string(),
        room_id: input.room_id,
        check_in: input.check_in,
        check_out: input.check_out,
        status: input.status.unwrap_or_default(),
        payment_status: input.payment_status.unwrap_or_default(),
        total_price: supplied_total.unwrap_or(0),
        discount_amount: input.discount_amount.unwrap_or(0),
        currency: Default::default(),
        notes: optional_text(input.notes),
        invoice_number: optional_text(input.invoice_number),
        identification: optional_text(input.identification),
        created_at: now,
    };

    let room = admit(state, calendar, &candidate, None)?.clone();
    candidate.currency = room.currency;
    if supplied_total.is_none() {
        let quote = pricing::quote(
            calendar,
            &room,
            candidate.check_in,
            candidate.check_out,
            candidate.discount_amount,
        )?;
        candidate.total_price = quote.total.amount;
        candidate.discount_amount = quote.discount;
    }

    candidate.id = state.allocate_booking_id();
    state.bookings.push(candidate.clone());
    Ok(BookingWithRoom {
        booking: candidate,
        room,
    })
}

/// Merge a partial update and re-admit the result, excluding the booking
/// itself from the availability check. `total_price` is only changed when
/// supplied.
pub fn update_booking(
    state: &mut HotelState,
    calendar: &Calendar,
    id: DbId,
    input: UpdateBooking,
) -> Result<BookingWithRoom, CoreError> {
    let index = state
        .bookings
        .iter()
        .position(|b| b.id == id)
        .ok_or(CoreError::NotFound {
            entity: "Booking",
            id,
        })?;

    let mut merged = state.bookings[index].clone();
    let reprices = input.total_price.is_some();
    merge(&mut merged, input);

    let room = admit(state, calendar, &merged, Some(id))?.clone();
    if reprices {
        merged.currency = room.currency;
    }

    state.bookings[index] = merged.clone();
    Ok(BookingWithRoom {
        booking: merged,
        room,
    })
}

/// Remove a booking. Returns whether anything was removed; unknown ids are
/// not an error.
pub fn delete_booking(state: &mut HotelState, id: DbId) -> bool {
    let before = state.bookings.len();
    state.bookings.retain(|b| b.id != id);
    state.bookings.len() != before
}

pub fn get_booking(state: &HotelState, id: DbId) -> Result<BookingWithRoom, CoreError> {
    let booking = state.booking(id).ok_or(CoreError::NotFound {
        entity: "Booking",
        id,
    })?;
    let room = state.room(booking.room_id).ok_or_else(|| {
        CoreError::Internal(format!(
            "Booking {id} references missing room {}",
            booking.room_id
        ))
    })?;
    Ok(BookingWithRoom {
        booking: booking.clone(),
        room: room.clone(),
    })
}

/// Bookings matching `filter`, joined with their rooms, by check-in ascending.
pub fn list_bookings(state: &HotelState, filter: &BookingFilter) -> Vec<BookingWithRoom> {
    let mut rows: Vec<BookingWithRoom> = state
        .bookings
        .iter()
        .filter_map(|b| state.room(b.room_id).map(|room| (b, room)))
        .filter(|(b, room)| filter.matches(b, room))
        .map(|(b, room)| BookingWithRoom {
            booking: b.clone(),
            room: room.clone(),
        })
        .collect();
    rows.sort_by(|a, b| {
        a.booking
            .check_in
            .cmp(&b.booking.check_in)
            .then(a.booking.id.cmp(&b.booking.id))
    });
    rows
}

fn merge(booking: &mut Booking, input: UpdateBooking) {
    if let Some(name) = input.guest_name {
        booking.guest_name = name.trim().to_string();
    }
    if let Some(phone) = input.phone {
        booking.phone = phone.trim().to_string();
    }
    if let Some(room_id) = input.room_id {
        booking.room_id = room_id;
    }
    if let Some(check_in) = input.check_in {
        booking.check_in = check_in;
    }
    if let Some(check_out) = input.check_out {
        booking.check_out = check_out;
    }
    if let Some(status) = input.status {
        booking.status = status;
    }
    if let Some(payment_status) = input.payment_status {
        booking.payment_status = payment_status;
    }
    if let Some(total) = input.total_price {
        booking.total_price = total;
    }
    if let Some(discount) = input.discount_amount {
        booking.discount_amount = discount;
    }
    if input.notes.is_some() {
        booking.notes = optional_text(input.notes);
    }
    if input.invoice_number.is_some() {
        booking.invoice_number = optional_text(input.invoice_number);
    }
    if input.identification.is_some() {
        booking.identification = optional_text(input.identification);
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::catalog;
    use crate::models::booking::BookingStatus;
    use crate::models::room::CreateRoom;
    use crate::money::Currency;

    fn ts(raw: &str) -> Timestamp {
        Calendar::utc().parse_timestamp(raw).unwrap()
    }

    fn hotel_with_room(price: i64, currency: Currency) -> (HotelState, DbId) {
        let mut state = HotelState::default();
        let room = catalog::create_room(
            &mut state,
            CreateRoom {
                room_number: "101".into(),
                room_type: "Standard".into(),
                status: None,
                price: Some(price),
                currency: Some(currency),
            },
        )
        .unwrap();
        (state, room.id)
    }

    fn stay(room_id: DbId, guest: &str, check_in: &str, check_out: &str) -> CreateBooking {
        CreateBooking {
            guest_name: guest.into(),
            phone: "555-0101".into(),
            room_id,
            check_in: ts(check_in),
            check_out: ts(check_out),
            status: None,
            payment_status: None,
            total_price: None,
            discount_amount: None,
            notes: None,
            invoice_number: None,
            identification: None,
        }
    }

    fn now() -> Timestamp {
        ts("2024-01-01T08:00:00Z")
    }

    #[test]
    fn reference_scenario() {
        let cal = Calendar::utc();
        let (mut state, room) = hotel_with_room(250_000, Currency::Local);

        let a = create_booking(&mut state, &cal, stay(room, "A", "2024-01-10T14:00", "2024-01-12T11:00"), now())
            .unwrap();
        assert_eq!(a.booking.total_price, 500_000);
        assert_eq!(a.room.room_number, "101");

        let b = create_booking(&mut state, &cal, stay(room, "B", "2024-01-11T09:00", "2024-01-13T09:00"), now());
        assert_matches!(
            b,
            Err(CoreError::DoubleBooked { ref conflicting, .. }) if conflicting == &vec![a.booking.id]
        );

        let c = create_booking(&mut state, &cal, stay(room, "C", "2024-01-12T00:00", "2024-01-14T00:00"), now());
        assert!(c.is_ok());
        assert_eq!(state.bookings.len(), 2);
    }

    #[test]
    fn rejects_inverted_interval_before_anything_else() {
        let cal = Calendar::utc();
        let (mut state, _) = hotel_with_room(100, Currency::Local);
        let result = create_booking(&mut state, &cal, stay(99, "A", "2024-01-12", "2024-01-10"), now());
        assert_matches!(result, Err(CoreError::InvalidInterval));
        assert!(state.bookings.is_empty());
    }

    #[test]
    fn rejects_unknown_room() {
        let cal = Calendar::utc();
        let (mut state, _) = hotel_with_room(100, Currency::Local);
        let result = create_booking(&mut state, &cal, stay(99, "A", "2024-01-10", "2024-01-12"), now());
        assert_matches!(result, Err(CoreError::RoomNotFound { id: 99 }));
    }

    #[test]
    fn rejects_blank_guest_name() {
        let cal = Calendar::utc();
        let (mut state, room) = hotel_with_room(100, Currency::Local);
        let result = create_booking(&mut state, &cal, stay(room, "  ", "2024-01-10", "2024-01-12"), now());
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn supplied_total_is_kept_and_non_positive_is_recomputed() {
        let cal = Calendar::utc();
        let (mut state, room) = hotel_with_room(100, Currency::Usd);

        let mut explicit = stay(room, "A", "2024-01-10", "2024-01-12");
        explicit.total_price = Some(150);
        explicit.discount_amount = Some(50);
        let kept = create_booking(&mut state, &cal, explicit, now()).unwrap();
        assert_eq!((kept.booking.total_price, kept.booking.discount_amount), (150, 50));
        assert_eq!(kept.booking.currency, Currency::Usd);

        let mut zero = stay(room, "B", "2024-01-12", "2024-01-15");
        zero.total_price = Some(0);
        zero.discount_amount = Some(1_000);
        let computed = create_booking(&mut state, &cal, zero, now()).unwrap();
        assert_eq!((computed.booking.total_price, computed.booking.discount_amount), (0, 300));
    }

    #[test]
    fn negative_discount_is_rejected() {
        let cal = Calendar::utc();
        let (mut state, room) = hotel_with_room(100, Currency::Local);
        let mut input = stay(room, "A", "2024-01-10", "2024-01-12");
        input.discount_amount = Some(-1);
        assert_matches!(create_booking(&mut state, &cal, input, now()), Err(CoreError::Validation(_)));
    }

    #[test]
    fn editing_notes_never_conflicts_with_itself() {
        let cal = Calendar::utc();
        let (mut state, room) = hotel_with_room(100, Currency::Local);
        let a = create_booking(&mut state, &cal, stay(room, "A", "2024-01-10", "2024-01-12"), now()).unwrap();

        let updated = update_booking(
            &mut state,
            &cal,
            a.booking.id,
            UpdateBooking {
                notes: Some("Late arrival".into()),
                status: Some(BookingStatus::CheckedIn),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.booking.notes.as_deref(), Some("Late arrival"));
        assert_eq!(updated.booking.total_price, a.booking.total_price);
        assert_eq!(updated.booking.created_at, a.booking.created_at);
    }

    #[test]
    fn update_rechecks_merged_interval_and_availability() {
        let cal = Calendar::utc();
        let (mut state, room) = hotel_with_room(100, Currency::Local);
        let a = create_booking(&mut state, &cal, stay(room, "A", "2024-01-10", "2024-01-12"), now()).unwrap();
        let b = create_booking(&mut state, &cal, stay(room, "B", "2024-01-12", "2024-01-14"), now()).unwrap();

        let inverted = UpdateBooking {
            check_out: Some(ts("2024-01-09")),
            ..Default::default()
        };
        assert_matches!(
            update_booking(&mut state, &cal, a.booking.id, inverted),
            Err(CoreError::InvalidInterval)
        );

        let extend = UpdateBooking {
            check_out: Some(ts("2024-01-13")),
            ..Default::default()
        };
        assert_matches!(
            update_booking(&mut state, &cal, a.booking.id, extend),
            Err(CoreError::DoubleBooked { .. })
        );
        assert_eq!(state.booking(a.booking.id).unwrap().check_out, ts("2024-01-12"));
        assert_eq!(state.booking(b.booking.id).unwrap().check_in, ts("2024-01-12"));
    }

    #[test]
    fn update_unknown_booking_is_not_found() {
        let cal = Calendar::utc();
        let (mut state, _) = hotel_with_room(100, Currency::Local);
        assert_matches!(
            update_booking(&mut state, &cal, 5, UpdateBooking::default()),
            Err(CoreError::NotFound { entity: "Booking", id: 5 })
        );
    }

    #[test]
    fn invoice_numbers_are_unique() {
        let cal = Calendar::utc();
        let (mut state, room) = hotel_with_room(100, Currency::Local);
        let mut first = stay(room, "A", "2024-01-10", "2024-01-12");
        first.invoice_number = Some("INV-1".into());
        create_booking(&mut state, &cal, first, now()).unwrap();

        let mut second = stay(room, "B", "2024-02-10", "2024-02-12");
        second.invoice_number = Some(" INV-1 ".into());
        assert_matches!(create_booking(&mut state, &cal, second, now()), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn delete_twice_is_fine() {
        let cal = Calendar::utc();
        let (mut state, room) = hotel_with_room(100, Currency::Local);
        let a = create_booking(&mut state, &cal, stay(room, "A", "2024-01-10", "2024-01-12"), now()).unwrap();
        assert!(delete_booking(&mut state, a.booking.id));
        assert!(!delete_booking(&mut state, a.booking.id));
    }

    #[test]
    fn list_sorts_by_check_in() {
        let cal = Calendar::utc();
        let (mut state, room) = hotel_with_room(100, Currency::Local);
        create_booking(&mut state, &cal, stay(room, "Late", "2024-03-01", "2024-03-02"), now()).unwrap();
        create_booking(&mut state, &cal, stay(room, "Early", "2024-01-01", "2024-01-02"), now()).unwrap();

        let names: Vec<_> = list_bookings(&state, &BookingFilter::default())
            .into_iter()
            .map(|row| row.booking.guest_name)
            .collect();
        assert_eq!(names, ["Early", "Late"]);
    }
}
