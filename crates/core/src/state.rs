//! The persisted hotel document.

use serde::{Deserialize, Serialize};

use crate::models::booking::Booking;
use crate::models::room::Room;
use crate::models::settings::Settings;
use crate::types::DbId;

const FIRST_ID: DbId = 1;

fn first_id() -> DbId {
    FIRST_ID
}

/// Every room, booking and the settings singleton, plus id counters.
///
/// Mutations read the whole document, change an in-memory copy, and commit
/// the whole document back through the port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelState {
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub settings: Option<Settings>,
    #[serde(default = "first_id")]
    pub next_room_id: DbId,
    #[serde(default = "first_id")]
    pub next_booking_id: DbId,
    #[serde(default = "first_id")]
    pub next_settings_id: DbId,
}

impl Default for HotelState {
    fn default() -> Self {
        Self {
            rooms: Vec::new(),
            bookings: Vec::new(),
            settings: None,
            next_room_id: FIRST_ID,
            next_booking_id: FIRST_ID,
            next_settings_id: FIRST_ID,
        }
    }
}

impl HotelState {
    pub fn room(&self, id: DbId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn booking(&self, id: DbId) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    pub fn room_by_number(&self, room_number: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.room_number == room_number)
    }

    pub fn bookings_for_room(&self, room_id: DbId) -> impl Iterator<Item = &Booking> {
        self.bookings.iter().filter(move |b| b.room_id == room_id)
    }

    pub(crate) fn allocate_room_id(&mut self) -> DbId {
        let id = self.next_room_id.max(self.max_room_id() + 1);
        self.next_room_id = id + 1;
        id
    }

    pub(crate) fn allocate_booking_id(&mut self) -> DbId {
        let id = self.next_booking_id.max(self.max_booking_id() + 1);
        self.next_booking_id = id + 1;
        id
    }

    /// The settings singleton, created with defaults if missing.
    pub(crate) fn settings_or_default(&mut self) -> &mut Settings {
        let next_id = &mut self.next_settings_id;
        self.settings.get_or_insert_with(|| {
            let id = *next_id;
            *next_id += 1;
            Settings::defaults(id)
        })
    }

    // Counters in hand-edited documents may lag behind existing ids.
    fn max_room_id(&self) -> DbId {
        self.rooms.iter().map(|r| r.id).max().unwrap_or(0)
    }

    fn max_booking_id(&self) -> DbId {
        self.bookings.iter().map(|b| b.id).max().unwrap_or(0)
    }
}
