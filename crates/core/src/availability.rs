//! Room availability under the half-open night model.
//!
//! A stay occupies the nights `[dateOnly(checkIn), dateOnly(checkOut))`: the
//! checkout date itself is free for a new arrival. Two stays conflict iff
//! `existingFrom < to && existingTo > from`. Everything here is pure.

use chrono::NaiveDate;

use crate::calendar::Calendar;
use crate::models::booking::Booking;
use crate::types::{DbId, Timestamp};

/// The booked nights of a stay, as hotel-local dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl NightRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Truncate a stay's timestamps to date-only boundaries.
    pub fn of_stay(calendar: &Calendar, check_in: Timestamp, check_out: Timestamp) -> Self {
        Self {
            from: calendar.date_only(check_in),
            to: calendar.date_only(check_out),
        }
    }

    pub fn of_booking(calendar: &Calendar, booking: &Booking) -> Self {
        Self::of_stay(calendar, booking.check_in, booking.check_out)
    }

    /// Whole calendar days between the two dates (may be zero).
    pub fn day_span(&self) -> i64 {
        (self.to - self.from).num_days()
    }

    /// Strict half-open overlap test.
    pub fn overlaps(&self, other: &NightRange) -> bool {
        other.from < self.to && other.to > self.from
    }
}

/// Candidate stay checked against a room's existing bookings.
#[derive(Debug, Clone, Copy)]
pub struct StayRequest {
    pub room_id: DbId,
    pub check_in: Timestamp,
    pub check_out: Timestamp,
    /// Booking being edited in place; never conflicts with itself.
    pub exclude: Option<DbId>,
}

/// Ids of bookings on the same room whose nights overlap the request.
pub fn find_conflicts(calendar: &Calendar, bookings: &[Booking], request: &StayRequest) -> Vec<DbId> {
    let wanted = NightRange::of_stay(calendar, request.check_in, request.check_out);
    bookings
        .iter()
        .filter(|b| b.room_id == request.room_id)
        .filter(|b| request.exclude != Some(b.id))
        .filter(|b| NightRange::of_booking(calendar, b).overlaps(&wanted))
        .map(|b| b.id)
        .collect()
}

pub fn is_available(calendar: &Calendar, bookings: &[Booking], request: &StayRequest) -> bool {
    find_conflicts(calendar, bookings, request).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::{BookingStatus, PaymentStatus};
    use crate::money::Currency;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn ts(raw: &str) -> Timestamp {
        Calendar::utc().parse_timestamp(raw).unwrap()
    }

    fn booking(id: DbId, room_id: DbId, check_in: &str, check_out: &str) -> Booking {
        Booking {
            id,
            guest_name: format!("Guest {id}"),
            phone: "555-0100".into(),
            room_id,
            check_in: ts(check_in),
            check_out: ts(check_out),
            status: BookingStatus::Reserved,
            payment_status: PaymentStatus::Unpaid,
            total_price: 0,
            discount_amount: 0,
            currency: Currency::Local,
            notes: None,
            invoice_number: None,
            identification: None,
            created_at: ts("2024-01-01T00:00:00Z"),
        }
    }

    fn request(room_id: DbId, check_in: &str, check_out: &str) -> StayRequest {
        StayRequest {
            room_id,
            check_in: ts(check_in),
            check_out: ts(check_out),
            exclude: None,
        }
    }

    #[test]
    fn overlap_is_symmetric() {
        let days = ["2024-01-08", "2024-01-10", "2024-01-11", "2024-01-12", "2024-01-14"];
        for a1 in days {
            for a2 in days {
                for b1 in days {
                    for b2 in days {
                        let a = NightRange::new(date(a1), date(a2));
                        let b = NightRange::new(date(b1), date(b2));
                        assert_eq!(a.overlaps(&b), b.overlaps(&a), "{a:?} vs {b:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn adjacent_stays_do_not_conflict() {
        let a = NightRange::new(date("2024-01-10"), date("2024-01-12"));
        let b = NightRange::new(date("2024-01-12"), date("2024-01-14"));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn time_of_day_is_ignored() {
        let existing = vec![booking(1, 101, "2024-01-10T14:00:00Z", "2024-01-12T11:00:00Z")];
        // Arrives at 09:00 on A's checkout day: still free.
        let req = request(101, "2024-01-12T09:00:00Z", "2024-01-13T09:00:00Z");
        assert!(is_available(&Calendar::utc(), &existing, &req));
    }

    #[test]
    fn overlapping_night_conflicts() {
        let existing = vec![booking(1, 101, "2024-01-10T14:00:00Z", "2024-01-12T11:00:00Z")];
        let req = request(101, "2024-01-11T09:00:00Z", "2024-01-13T09:00:00Z");
        assert_eq!(find_conflicts(&Calendar::utc(), &existing, &req), vec![1]);
    }

    #[test]
    fn other_rooms_are_ignored() {
        let existing = vec![booking(1, 102, "2024-01-10T14:00:00Z", "2024-01-12T11:00:00Z")];
        let req = request(101, "2024-01-10T14:00:00Z", "2024-01-12T11:00:00Z");
        assert!(is_available(&Calendar::utc(), &existing, &req));
    }

    #[test]
    fn excluded_booking_never_conflicts_with_itself() {
        let existing = vec![booking(7, 101, "2024-01-10T14:00:00Z", "2024-01-12T11:00:00Z")];
        let mut req = request(101, "2024-01-10T14:00:00Z", "2024-01-12T11:00:00Z");
        assert!(!is_available(&Calendar::utc(), &existing, &req));
        req.exclude = Some(7);
        assert!(is_available(&Calendar::utc(), &existing, &req));
    }

    #[test]
    fn enclosing_stay_conflicts() {
        let existing = vec![booking(1, 101, "2024-01-11T14:00:00Z", "2024-01-12T11:00:00Z")];
        let req = request(101, "2024-01-09T14:00:00Z", "2024-01-15T11:00:00Z");
        assert!(!is_available(&Calendar::utc(), &existing, &req));
    }

    #[test]
    fn hotel_offset_shifts_night_boundaries() {
        // At UTC+7, 18:00Z on the 11th is already the 12th locally, which is
        // the existing stay's checkout day. In UTC it is still the 11th.
        let cal = Calendar::from_offset_minutes(7 * 60).unwrap();
        let existing = vec![booking(1, 101, "2024-01-10T07:00:00Z", "2024-01-12T03:00:00Z")];
        let req = request(101, "2024-01-11T18:00:00Z", "2024-01-13T04:00:00Z");
        assert!(is_available(&cal, &existing, &req));
        assert!(!is_available(&Calendar::utc(), &existing, &req));
    }
}
