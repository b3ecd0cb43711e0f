//! PostgreSQL adapter.
//!
//! State is stored relationally (`rooms`, `bookings`, `settings`,
//! `id_counters`). A commit replaces every table inside one transaction that
//! first takes a transaction-scoped advisory lock, so commits from several
//! processes are serialized and readers never see a half-written state.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{FromRow, PgConnection};
use sunin_core::models::booking::Booking;
use sunin_core::models::room::Room;
use sunin_core::models::settings::Settings;
use sunin_core::port::{PersistencePort, StorageError};
use sunin_core::types::{DbId, Timestamp};
use sunin_core::HotelState;

use crate::DbPool;

/// Advisory lock key guarding whole-state commits ("SUNIN" in ASCII).
const COMMIT_LOCK_KEY: i64 = 0x53_55_4E_49_4E;

const ROOM_COLUMNS: &str = "id, room_number, room_type, status, price, currency";

const BOOKING_COLUMNS: &str = "id, guest_name, phone, room_id, check_in, check_out, \
    status, payment_status, total_price, discount_amount, currency, notes, \
    invoice_number, identification, created_at";

const SETTINGS_COLUMNS: &str =
    "id, hotel_name, hotel_address, hotel_phone, hotel_logo, tax_rate";

pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

#[derive(Debug, FromRow)]
struct RoomRow {
    id: DbId,
    room_number: String,
    room_type: String,
    status: String,
    price: i64,
    currency: String,
}

impl RoomRow {
    fn into_room(self) -> Result<Room, StorageError> {
        Ok(Room {
            id: self.id,
            room_number: self.room_number,
            room_type: self.room_type,
            status: from_text(self.status)?,
            price: self.price,
            currency: from_text(self.currency)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct BookingRow {
    id: DbId,
    guest_name: String,
    phone: String,
    room_id: DbId,
    check_in: Timestamp,
    check_out: Timestamp,
    status: String,
    payment_status: String,
    total_price: i64,
    discount_amount: i64,
    currency: String,
    notes: Option<String>,
    invoice_number: Option<String>,
    identification: Option<String>,
    created_at: Timestamp,
}

impl BookingRow {
    fn into_booking(self) -> Result<Booking, StorageError> {
        Ok(Booking {
            id: self.id,
            guest_name: self.guest_name,
            phone: self.phone,
            room_id: self.room_id,
            check_in: self.check_in,
            check_out: self.check_out,
            status: from_text(self.status)?,
            payment_status: from_text(self.payment_status)?,
            total_price: self.total_price,
            discount_amount: self.discount_amount,
            currency: from_text(self.currency)?,
            notes: self.notes,
            invoice_number: self.invoice_number,
            identification: self.identification,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct SettingsRow {
    id: DbId,
    hotel_name: String,
    hotel_address: String,
    hotel_phone: String,
    hotel_logo: Option<String>,
    tax_rate: f64,
}

impl From<SettingsRow> for Settings {
    fn from(row: SettingsRow) -> Self {
        Settings {
            id: row.id,
            hotel_name: row.hotel_name,
            hotel_address: row.hotel_address,
            hotel_phone: row.hotel_phone,
            hotel_logo: row.hotel_logo,
            tax_rate: row.tax_rate,
        }
    }
}

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

#[async_trait]
impl PersistencePort for PgStore {
    async fn load(&self) -> Result<HotelState, StorageError> {
        let mut tx = self.pool.begin().await.map_err(db)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(db)?;
        let state = read_state(&mut tx).await?;
        tx.commit().await.map_err(db)?;
        Ok(state)
    }

    async fn commit(&self, state: &HotelState) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(db)?;
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(COMMIT_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(db)?;
        write_state(&mut tx, state).await?;
        tx.commit().await.map_err(db)?;
        tracing::debug!(
            rooms = state.rooms.len(),
            bookings = state.bookings.len(),
            "Committed hotel state to PostgreSQL"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        "postgres".to_string()
    }
}

async fn read_state(conn: &mut PgConnection) -> Result<HotelState, StorageError> {
    let rooms = sqlx::query_as::<_, RoomRow>(&format!(
        "SELECT {ROOM_COLUMNS} FROM rooms ORDER BY id"
    ))
    .fetch_all(&mut *conn)
    .await
    .map_err(db)?
    .into_iter()
    .map(RoomRow::into_room)
    .collect::<Result<Vec<_>, _>>()?;

    let bookings = sqlx::query_as::<_, BookingRow>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY id"
    ))
    .fetch_all(&mut *conn)
    .await
    .map_err(db)?
    .into_iter()
    .map(BookingRow::into_booking)
    .collect::<Result<Vec<_>, _>>()?;

    let settings = sqlx::query_as::<_, SettingsRow>(&format!(
        "SELECT {SETTINGS_COLUMNS} FROM settings ORDER BY id LIMIT 1"
    ))
    .fetch_optional(&mut *conn)
    .await
    .map_err(db)?
    .map(Settings::from);

    let counters: Vec<(String, i64)> = sqlx::query_as("SELECT name, next_id FROM id_counters")
        .fetch_all(&mut *conn)
        .await
        .map_err(db)?;
    let counter = |name: &str| {
        counters
            .iter()
            .find(|(n, _)| n == name)
            .map_or(1, |(_, next)| *next)
    };

    Ok(HotelState {
        rooms,
        bookings,
        settings,
        next_room_id: counter("rooms"),
        next_booking_id: counter("bookings"),
        next_settings_id: counter("settings"),
    })
}

async fn write_state(conn: &mut PgConnection, state: &HotelState) -> Result<(), StorageError> {
    for table in ["bookings", "rooms", "settings"] {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *conn)
            .await
            .map_err(db)?;
    }

    let insert_room = format!("INSERT INTO rooms ({ROOM_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)");
    for room in &state.rooms {
        sqlx::query(&insert_room)
            .bind(room.id)
            .bind(&room.room_number)
            .bind(&room.room_type)
            .bind(room.status.as_str())
            .bind(room.price)
            .bind(room.currency.code())
            .execute(&mut *conn)
            .await
            .map_err(db)?;
    }

    let insert_booking = format!(
        "INSERT INTO bookings ({BOOKING_COLUMNS})
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)"
    );
    for booking in &state.bookings {
        sqlx::query(&insert_booking)
            .bind(booking.id)
            .bind(&booking.guest_name)
            .bind(&booking.phone)
            .bind(booking.room_id)
            .bind(booking.check_in)
            .bind(booking.check_out)
            .bind(to_text(&booking.status)?)
            .bind(to_text(&booking.payment_status)?)
            .bind(booking.total_price)
            .bind(booking.discount_amount)
            .bind(booking.currency.code())
            .bind(&booking.notes)
            .bind(&booking.invoice_number)
            .bind(&booking.identification)
            .bind(booking.created_at)
            .execute(&mut *conn)
            .await
            .map_err(db)?;
    }

    if let Some(settings) = &state.settings {
        sqlx::query(&format!(
            "INSERT INTO settings ({SETTINGS_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)"
        ))
        .bind(settings.id)
        .bind(&settings.hotel_name)
        .bind(&settings.hotel_address)
        .bind(&settings.hotel_phone)
        .bind(&settings.hotel_logo)
        .bind(settings.tax_rate)
        .execute(&mut *conn)
        .await
        .map_err(db)?;
    }

    for (name, next_id) in [
        ("rooms", state.next_room_id),
        ("bookings", state.next_booking_id),
        ("settings", state.next_settings_id),
    ] {
        sqlx::query(
            "INSERT INTO id_counters (name, next_id) VALUES ($1, $2)
             ON CONFLICT (name) DO UPDATE SET next_id = EXCLUDED.next_id",
        )
        .bind(name)
        .bind(next_id)
        .execute(&mut *conn)
        .await
        .map_err(db)?;
    }

    Ok(())
}

fn db(err: sqlx::Error) -> StorageError {
    StorageError::backend(err)
}

/// Encode a unit enum as its wire string (`"checked in"`, `"Paid"`).
fn to_text<T: Serialize>(value: &T) -> Result<String, StorageError> {
    match serde_json::to_value(value)? {
        serde_json::Value::String(text) => Ok(text),
        other => Err(StorageError::Backend(
            format!("expected a string enum, got {other}").into(),
        )),
    }
}

fn from_text<T: DeserializeOwned>(text: String) -> Result<T, StorageError> {
    Ok(serde_json::from_value(serde_json::Value::String(text))?)
}
