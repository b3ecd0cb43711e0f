//! Domain records and request DTOs.
//!
//! Wire names are camelCase to match the HTTP contract and the persisted
//! document layout.

pub mod booking;
pub mod room;
pub mod settings;

/// Deserializers tolerant of form-encoded numbers (`"250000"`).
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        Text(String),
    }

    pub fn option_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<NumberOrString>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumberOrString::Number(n)) => Ok(Some(n)),
            Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(NumberOrString::Text(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("expected an integer, got '{s}'"))),
        }
    }
}
