//! Booking list filters for table and calendar views.
//!
//! The date window here is deliberately looser than conflict detection: a
//! booking qualifies if it merely touches the window.

use crate::models::booking::Booking;
use crate::models::room::Room;
use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub room_id: Option<DbId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    /// Case-insensitive text match on guest, phone, room number and invoice.
    pub search: Option<String>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking, room: &Room) -> bool {
        self.room_id.map_or(true, |id| booking.room_id == id)
            && self.touches_window(booking)
            && self.matches_text(booking, room)
    }

    fn touches_window(&self, booking: &Booking) -> bool {
        let (check_in, check_out) = (booking.check_in, booking.check_out);
        match (self.from, self.to) {
            (Some(from), Some(to)) => {
                (check_in >= from && check_in <= to)
                    || (check_out >= from && check_out <= to)
                    || (check_in <= from && check_out >= to)
            }
            (Some(from), None) => check_out >= from,
            (None, Some(to)) => check_in <= to,
            (None, None) => true,
        }
    }

    fn matches_text(&self, booking: &Booking, room: &Room) -> bool {
        let needle = match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => needle.to_lowercase(),
            _ => return true,
        };
        [
            Some(booking.guest_name.as_str()),
            Some(booking.phone.as_str()),
            Some(room.room_number.as_str()),
            booking.invoice_number.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|hay| hay.to_lowercase().contains(&needle))
    }
}
