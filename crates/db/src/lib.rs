//! Persistence adapters for the Sunin booking ledger.
//!
//! Each adapter implements [`sunin_core::PersistencePort`]:
//!
//! - [`FileStore`]: one JSON document, committed by atomic rename.
//! - [`PgStore`]: PostgreSQL tables, committed in a single transaction.
//! - [`MemoryStore`]: process-local, for tests and throwaway runs.

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sunin_core::PersistencePort;

pub mod file_store;
pub mod memory_store;
pub mod pg_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use pg_store::PgStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Which adapter backs the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    File { data_dir: PathBuf },
    Postgres { database_url: String },
    Memory,
}

impl StorageBackend {
    /// Resolve a backend name (`file`, `postgres`, `memory`) plus its settings.
    pub fn from_parts(
        name: &str,
        data_dir: PathBuf,
        database_url: Option<String>,
    ) -> Result<Self, OpenStoreError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File { data_dir }),
            "postgres" | "postgresql" => database_url
                .map(|database_url| StorageBackend::Postgres { database_url })
                .ok_or(OpenStoreError::MissingDatabaseUrl),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(OpenStoreError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OpenStoreError {
    #[error("Unknown storage backend '{0}'. Expected one of: file, postgres, memory")]
    UnknownBackend(String),

    #[error("DATABASE_URL must be set when STORAGE_BACKEND=postgres")]
    MissingDatabaseUrl,

    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Build the configured adapter. The PostgreSQL backend is health-checked
/// and migrated before it is returned.
pub async fn open_store(backend: &StorageBackend) -> Result<Arc<dyn PersistencePort>, OpenStoreError> {
    let store: Arc<dyn PersistencePort> = match backend {
        StorageBackend::File { data_dir } => {
            let store = FileStore::open(data_dir).map_err(|source| OpenStoreError::DataDir {
                path: data_dir.clone(),
                source,
            })?;
            Arc::new(store)
        }
        StorageBackend::Postgres { database_url } => {
            let pool = create_pool(database_url).await?;
            health_check(&pool).await?;
            run_migrations(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
        StorageBackend::Memory => Arc::new(MemoryStore::default()),
    };
    tracing::info!(storage = %store.describe(), "Storage backend ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn backend_names_resolve() {
        let dir = PathBuf::from("./data");
        assert_eq!(
            StorageBackend::from_parts("File", dir.clone(), None).unwrap(),
            StorageBackend::File { data_dir: dir.clone() }
        );
        assert_eq!(
            StorageBackend::from_parts("memory", dir.clone(), None).unwrap(),
            StorageBackend::Memory
        );
        assert_matches!(
            StorageBackend::from_parts("postgres", dir.clone(), None),
            Err(OpenStoreError::MissingDatabaseUrl)
        );
        assert_matches!(
            StorageBackend::from_parts("redis", dir, None),
            Err(OpenStoreError::UnknownBackend(name)) if name == "redis"
        );
    }
}
