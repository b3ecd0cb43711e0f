//! Stay pricing.
//!
//! `nights = max(1, dateOnly(checkOut) - dateOnly(checkIn))`; the subtotal is
//! `nights * room.price` in the room's stored units. Discounts are clamped so
//! a total can never go negative.

use crate::availability::NightRange;
use crate::calendar::Calendar;
use crate::error::CoreError;
use crate::models::room::Room;
use crate::money::Money;
use crate::types::Timestamp;

/// Priced nights for a stay, floored at one.
pub fn nights(calendar: &Calendar, check_in: Timestamp, check_out: Timestamp) -> i64 {
    NightRange::of_stay(calendar, check_in, check_out).day_span().max(1)
}

/// A computed price breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub nights: i64,
    pub subtotal: Money,
    /// Discount actually applied (requested amount clamped to the subtotal).
    pub discount: i64,
    pub total: Money,
}

/// Price a stay in `room`, netting `requested_discount` (clamped to `0..=subtotal`).
pub fn quote(
    calendar: &Calendar,
    room: &Room,
    check_in: Timestamp,
    check_out: Timestamp,
    requested_discount: i64,
) -> Result<Quote, CoreError> {
    let nights = nights(calendar, check_in, check_out);
    let subtotal = room.nightly_rate().checked_mul(nights)?;
    let discount = requested_discount.min(subtotal.amount).max(0);
    Ok(Quote {
        nights,
        subtotal,
        discount,
        total: Money::new(subtotal.amount - discount, subtotal.currency),
    })
}
