//! Point-in-time occupancy statistics.

use serde::Serialize;

use crate::calendar::DayWindow;
use crate::state::HotelState;

/// Counts are independent: a same-day turnover booking contributes to both
/// check-ins and check-outs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_occupied: usize,
    pub check_ins_today: usize,
    pub check_outs_today: usize,
    pub available_rooms: usize,
}

pub fn compute_stats(state: &HotelState, today: DayWindow) -> DashboardStats {
    let mut stats = DashboardStats::default();
    for booking in &state.bookings {
        if today.intersects(booking.check_in, booking.check_out) {
            stats.total_occupied += 1;
        }
        if today.contains(booking.check_in) {
            stats.check_ins_today += 1;
        }
        if today.contains(booking.check_out) {
            stats.check_outs_today += 1;
        }
    }
    stats.available_rooms = state.rooms.len().saturating_sub(stats.total_occupied);
    stats
}
