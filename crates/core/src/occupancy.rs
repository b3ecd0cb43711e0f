//! Derived room occupancy.
//!
//! `Occupied` is never stored on a room. It is computed at read time from
//! checked-in bookings whose stay intersects today.

use crate::calendar::DayWindow;
use crate::models::booking::BookingStatus;
use crate::models::room::{DisplayStatus, Room, RoomStatus, RoomView};
use crate::state::HotelState;

pub fn display_status(state: &HotelState, room: &Room, today: DayWindow) -> DisplayStatus {
    let in_house = state.bookings_for_room(room.id).any(|b| {
        b.status == BookingStatus::CheckedIn && today.intersects(b.check_in, b.check_out)
    });
    match (in_house, room.status) {
        (true, _) => DisplayStatus::Occupied,
        (false, RoomStatus::Available) => DisplayStatus::Available,
        (false, RoomStatus::Maintenance) => DisplayStatus::Maintenance,
    }
}

pub fn view(state: &HotelState, room: Room, today: DayWindow) -> RoomView {
    let display_status = display_status(state, &room, today);
    RoomView {
        room,
        display_status,
    }
}

pub fn views(state: &HotelState, rooms: Vec<Room>, today: DayWindow) -> Vec<RoomView> {
    rooms
        .into_iter()
        .map(|room| view(state, room, today))
        .collect()
}
