//! Room catalog rules: CRUD over rooms with unique room numbers.
//!
//! Deleting a room cascades to every booking that references it.

use validator::Validate;

use crate::error::CoreError;
use crate::models::room::{CreateRoom, Room, UpdateRoom};
use crate::state::HotelState;
use crate::types::DbId;
use crate::validation::parse_room_status;

/// Rooms ordered by room number.
pub fn list_rooms(state: &HotelState) -> Vec<Room> {
    let mut rooms = state.rooms.clone();
    rooms.sort_by(|a, b| a.room_number.cmp(&b.room_number).then(a.id.cmp(&b.id)));
    rooms
}

pub fn find_room(state: &HotelState, id: DbId) -> Result<&Room, CoreError> {
    state
        .room(id)
        .ok_or(CoreError::NotFound { entity: "Room", id })
}

pub fn create_room(state: &mut HotelState, input: CreateRoom) -> Result<Room, CoreError> {
    input.validate()?;
    let status = input
        .status
        .as_deref()
        .map(parse_room_status)
        .transpose()?
        .unwrap_or_default();
    let room_number = input.room_number.trim().to_string();
    ensure_unique_number(state, &room_number, None)?;

    let room = Room {
        id: state.allocate_room_id(),
        room_number,
        room_type: input.room_type.trim().to_string(),
        status,
        price: input.price.unwrap_or(0),
        currency: input.currency.unwrap_or_default(),
    };
    state.rooms.push(room.clone());
    Ok(room)
}

/// Merge a partial update onto a room. Existing bookings keep their price
/// snapshot even if the rate or currency changes.
pub fn update_room(state: &mut HotelState, id: DbId, input: UpdateRoom) -> Result<Room, CoreError> {
    input.validate()?;
    let status = input.status.as_deref().map(parse_room_status).transpose()?;
    let room_number = input.room_number.map(|n| n.trim().to_string());
    if let Some(number) = &room_number {
        ensure_unique_number(state, number, Some(id))?;
    }

    let room = state
        .rooms
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or(CoreError::NotFound { entity: "Room", id })?;

    if let Some(number) = room_number {
        room.room_number = number;
    }
    if let Some(room_type) = input.room_type {
        room.room_type = room_type.trim().to_string();
    }
    if let Some(status) = status {
        room.status = status;
    }
    if let Some(price) = input.price {
        room.price = price;
    }
    if let Some(currency) = input.currency {
        room.currency = currency;
    }
    Ok(room.clone())
}

/// Outcome of a room deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomRemoval {
    pub room_removed: bool,
    pub bookings_removed: usize,
}

/// Remove a room and every booking referencing it. Unknown ids are a no-op.
pub fn delete_room(state: &mut HotelState, id: DbId) -> RoomRemoval {
    let rooms_before = state.rooms.len();
    state.rooms.retain(|r| r.id != id);
    let bookings_before = state.bookings.len();
    state.bookings.retain(|b| b.room_id != id);
    RoomRemoval {
        room_removed: state.rooms.len() != rooms_before,
        bookings_removed: bookings_before - state.bookings.len(),
    }
}

fn ensure_unique_number(state: &HotelState, room_number: &str, exclude: Option<DbId>) -> Result<(), CoreError> {
    match state.room_by_number(room_number) {
        Some(existing) if Some(existing.id) != exclude => Err(CoreError::Conflict(format!(
            "Room number '{room_number}' already exists"
        ))),
        _ => Ok(()),
    }
}
