use std::path::PathBuf;

use sunin_core::{Calendar, CoreError};
use sunin_db::StorageBackend;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub storage: StorageBackend,
    /// The hotel's fixed offset east of UTC; defines "today" and night boundaries.
    pub utc_offset_minutes: i32,
    /// Seed demo rooms and bookings into an empty store on startup.
    pub seed_demo_data: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `3000`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `STORAGE_BACKEND`          | `file`                  |
    /// | `HOTEL_DATA_DIR`           | `./data`                |
    /// | `DATABASE_URL`             | (postgres only)         |
    /// | `HOTEL_UTC_OFFSET_MINUTES` | `0`                     |
    /// | `SEED_DEMO_DATA`           | `false`                 |
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let storage = StorageBackend::from_parts(
            &std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "file".into()),
            std::env::var("HOTEL_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            std::env::var("DATABASE_URL").ok(),
        )
        .unwrap_or_else(|e| panic!("Invalid storage configuration: {e}"));

        let utc_offset_minutes: i32 = std::env::var("HOTEL_UTC_OFFSET_MINUTES")
            .unwrap_or_else(|_| "0".into())
            .parse()
            .expect("HOTEL_UTC_OFFSET_MINUTES must be a valid i32");

        let seed_demo_data = std::env::var("SEED_DEMO_DATA")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            storage,
            utc_offset_minutes,
            seed_demo_data,
        }
    }

    pub fn calendar(&self) -> Result<Calendar, CoreError> {
        Calendar::from_offset_minutes(self.utc_offset_minutes)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
