//! The ledger service: every read and write of hotel state goes through here.
//!
//! Mutations hold a single writer lock across load, validate, mutate and
//! commit, so an availability check and the commit that follows it are atomic
//! with respect to every other mutation in the process. Reads load without
//! the lock and always observe a whole committed state.

use std::sync::Arc;

use tokio::sync::Mutex;
use validator::Validate;

use crate::calendar::Calendar;
use crate::catalog::{self, RoomRemoval};
use crate::dashboard::{self, DashboardStats};
use crate::error::CoreError;
use crate::models::booking::{BookingWithRoom, CreateBooking, UpdateBooking};
use crate::models::room::{CreateRoom, RoomView, UpdateRoom};
use crate::models::settings::{Settings, UpdateSettings};
use crate::occupancy;
use crate::port::PersistencePort;
use crate::reservations;
use crate::search::BookingFilter;
use crate::state::HotelState;
use crate::types::{DbId, Timestamp};

pub struct Ledger {
    port: Arc<dyn PersistencePort>,
    calendar: Calendar,
    writer: Mutex<()>,
}

impl Ledger {
    pub fn new(port: Arc<dyn PersistencePort>, calendar: Calendar) -> Self {
        Self {
            port,
            calendar,
            writer: Mutex::new(()),
        }
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn storage(&self) -> String {
        self.port.describe()
    }

    /// The last committed state.
    pub async fn snapshot(&self) -> Result<HotelState, CoreError> {
        Ok(self.port.load().await?)
    }

    /// Run `op` against a fresh copy of state under the writer lock.
    ///
    /// Nothing is committed when `op` fails or leaves the state unchanged.
    async fn mutate<T, F>(&self, op: &'static str, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut HotelState) -> Result<T, CoreError>,
    {
        let _guard = self.writer.lock().await;
        let mut state = self.port.load().await?;
        let before = state.clone();
        let out = f(&mut state)?;
        if state != before {
            if let Err(e) = self.port.commit(&state).await {
                tracing::error!(op, storage = %self.port.describe(), error = %e, "Commit failed");
                return Err(e.into());
            }
        }
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Rooms
    // -----------------------------------------------------------------------

    pub async fn list_rooms(&self, now: Timestamp) -> Result<Vec<RoomView>, CoreError> {
        let state = self.snapshot().await?;
        let today = self.calendar.today_window(now);
        Ok(occupancy::views(&state, catalog::list_rooms(&state), today))
    }

    pub async fn get_room(&self, id: DbId, now: Timestamp) -> Result<RoomView, CoreError> {
        let state = self.snapshot().await?;
        let room = catalog::find_room(&state, id)?.clone();
        Ok(occupancy::view(&state, room, self.calendar.today_window(now)))
    }

    pub async fn create_room(&self, input: CreateRoom, now: Timestamp) -> Result<RoomView, CoreError> {
        let today = self.calendar.today_window(now);
        self.mutate("create_room", |state| {
            let room = catalog::create_room(state, input)?;
            tracing::info!(room_id = room.id, room_number = %room.room_number, "Room created");
            Ok(occupancy::view(state, room, today))
        })
        .await
    }

    pub async fn update_room(
        &self,
        id: DbId,
        input: UpdateRoom,
        now: Timestamp,
    ) -> Result<RoomView, CoreError> {
        let today = self.calendar.today_window(now);
        self.mutate("update_room", |state| {
            let room = catalog::update_room(state, id, input)?;
            tracing::info!(room_id = room.id, "Room updated");
            Ok(occupancy::view(state, room, today))
        })
        .await
    }

    /// Delete a room and cascade to its bookings. Unknown ids are a no-op.
    pub async fn delete_room(&self, id: DbId) -> Result<RoomRemoval, CoreError> {
        self.mutate("delete_room", |state| {
            let removal = catalog::delete_room(state, id);
            if removal.room_removed {
                tracing::info!(
                    room_id = id,
                    bookings_removed = removal.bookings_removed,
                    "Room deleted"
                );
            }
            Ok(removal)
        })
        .await
    }

    // -----------------------------------------------------------------------
    // Bookings
    // -----------------------------------------------------------------------

    pub async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<BookingWithRoom>, CoreError> {
        let state = self.snapshot().await?;
        Ok(reservations::list_bookings(&state, filter))
    }

    pub async fn get_booking(&self, id: DbId) -> Result<BookingWithRoom, CoreError> {
        let state = self.snapshot().await?;
        reservations::get_booking(&state, id)
    }

    pub async fn create_booking(
        &self,
        input: CreateBooking,
        now: Timestamp,
    ) -> Result<BookingWithRoom, CoreError> {
        let calendar = self.calendar;
        self.mutate("create_booking", |state| {
            reservations::create_booking(state, &calendar, input, now)
        })
        .await
        .inspect(|created| {
            tracing::info!(
                booking_id = created.booking.id,
                room_id = created.booking.room_id,
                total_price = created.booking.total_price,
                "Booking created"
            );
        })
        .inspect_err(|e| log_rejection("create_booking", e))
    }

    pub async fn update_booking(
        &self,
        id: DbId,
        input: UpdateBooking,
    ) -> Result<BookingWithRoom, CoreError> {
        let calendar = self.calendar;
        self.mutate("update_booking", |state| {
            reservations::update_booking(state, &calendar, id, input)
        })
        .await
        .inspect(|updated| {
            tracing::info!(booking_id = id, room_id = updated.booking.room_id, "Booking updated");
        })
        .inspect_err(|e| log_rejection("update_booking", e))
    }

    /// Delete a booking. Unknown ids are a no-op.
    pub async fn delete_booking(&self, id: DbId) -> Result<bool, CoreError> {
        self.mutate("delete_booking", |state| {
            let removed = reservations::delete_booking(state, id);
            if removed {
                tracing::info!(booking_id = id, "Booking deleted");
            }
            Ok(removed)
        })
        .await
    }

    // -----------------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------------

    /// The settings singleton, persisting defaults on first access.
    pub async fn settings(&self) -> Result<Settings, CoreError> {
        if let Some(settings) = self.snapshot().await?.settings {
            return Ok(settings);
        }
        self.mutate("init_settings", |state| Ok(state.settings_or_default().clone()))
            .await
    }

    pub async fn update_settings(&self, input: UpdateSettings) -> Result<Settings, CoreError> {
        input.validate()?;
        self.mutate("update_settings", |state| {
            let settings = state.settings_or_default();
            settings.apply(input);
            tracing::info!(settings_id = settings.id, "Settings updated");
            Ok(settings.clone())
        })
        .await
    }

    // -----------------------------------------------------------------------
    // Dashboard
    // -----------------------------------------------------------------------

    pub async fn dashboard(&self, now: Timestamp) -> Result<DashboardStats, CoreError> {
        let state = self.snapshot().await?;
        Ok(dashboard::compute_stats(&state, self.calendar.today_window(now)))
    }
}

fn log_rejection(op: &'static str, err: &CoreError) {
    match err {
        CoreError::DoubleBooked { room_id, conflicting } => {
            tracing::warn!(op, room_id, ?conflicting, "Booking rejected: room already booked");
        }
        CoreError::Storage(_) | CoreError::Internal(_) => {}
        other => tracing::debug!(op, error = %other, "Booking rejected"),
    }
}
