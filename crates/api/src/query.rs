//! Query-string parameters.

use serde::Deserialize;
use sunin_core::search::BookingFilter;
use sunin_core::types::DbId;
use sunin_core::Calendar;

use crate::error::AppError;

/// `GET /api/bookings?search=&from=&to=&roomId=`
///
/// Everything arrives as text so empty values (`from=`) mean "not set".
/// Naive dates and times are read in hotel-local time.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListParams {
    pub search: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub room_id: Option<String>,
}

impl BookingListParams {
    pub fn into_filter(self, calendar: &Calendar) -> Result<BookingFilter, AppError> {
        let room_id = non_empty(self.room_id)
            .map(|raw| {
                raw.parse::<DbId>()
                    .map_err(|_| AppError::BadRequest(format!("Invalid roomId '{raw}'")))
            })
            .transpose()?;

        let timestamp = |name: &str, raw: Option<String>| {
            non_empty(raw)
                .map(|raw| {
                    calendar
                        .parse_timestamp(&raw)
                        .ok_or_else(|| AppError::BadRequest(format!("Invalid {name} '{raw}'")))
                })
                .transpose()
        };

        Ok(BookingFilter {
            room_id,
            from: timestamp("from", self.from)?,
            to: timestamp("to", self.to)?,
            search: non_empty(self.search),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
