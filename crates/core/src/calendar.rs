//! Hotel-local calendar arithmetic.
//!
//! Reservations are stored as UTC timestamps, but nights, check-in days and
//! "today" are all calendar concepts of the hotel's own time zone. Every
//! date-only comparison in the crate goes through a single [`Calendar`].

use chrono::{Days, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Naive date-time layouts accepted in addition to RFC 3339.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// A fixed-offset hotel calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl Calendar {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Build a calendar from an offset east of UTC, in minutes.
    pub fn from_offset_minutes(minutes: i32) -> Result<Self, CoreError> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(|offset| Self { offset })
            .ok_or_else(|| CoreError::Validation(format!("Invalid UTC offset: {minutes} minutes")))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The hotel-local calendar date of `ts` (time of day discarded).
    pub fn date_only(&self, ts: Timestamp) -> NaiveDate {
        ts.with_timezone(&self.offset).date_naive()
    }

    /// Local midnight of `date`, as a UTC instant.
    pub fn start_of_day(&self, date: NaiveDate) -> Timestamp {
        self.local_to_utc(date.and_time(NaiveTime::MIN))
    }

    /// `[startOfToday, startOfTomorrow)` around `now`.
    pub fn today_window(&self, now: Timestamp) -> DayWindow {
        let today = self.date_only(now);
        DayWindow {
            start: self.start_of_day(today),
            end: self.start_of_day(today + Days::new(1)),
        }
    }

    /// Parse a timestamp given as RFC 3339, a naive date-time, or a bare date.
    ///
    /// Naive values are read as hotel-local wall-clock time; a bare date is
    /// local midnight.
    pub fn parse_timestamp(&self, raw: &str) -> Option<Timestamp> {
        let raw = raw.trim();
        if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(self.local_to_utc(naive));
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(|date| self.start_of_day(date))
    }

    fn local_to_utc(&self, naive: NaiveDateTime) -> Timestamp {
        let shifted = naive - chrono::Duration::seconds(i64::from(self.offset.local_minus_utc()));
        Utc.from_utc_datetime(&shifted)
    }
}

/// A half-open `[start, end)` window of UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl DayWindow {
    pub fn contains(&self, ts: Timestamp) -> bool {
        self.start <= ts && ts < self.end
    }

    /// Whether the half-open stay `[from, to)` shares any instant with the window.
    pub fn intersects(&self, from: Timestamp, to: Timestamp) -> bool {
        from < self.end && to > self.start
    }
}

/// Serde adapters for timestamps in request bodies.
///
/// Accepts RFC 3339 and naive date-times; naive values are taken as UTC
/// because a request body carries no hotel context.
pub mod flexible {
    use serde::{Deserialize, Deserializer};

    use super::Calendar;
    use crate::types::Timestamp;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Calendar::utc()
            .parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => Calendar::utc()
                .parse_timestamp(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'"))),
        }
    }
}
