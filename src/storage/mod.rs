//! Trait-based storage abstractions with in-memory, SQLite, and PostgreSQL backends.

pub mod inmemory;
pub mod traits;

// Feature-gated storage implementations
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

// Re-export commonly used types and traits
pub use inmemory::MemoryAuthStorage;
pub use traits::*;

#[cfg(feature = "postgres")]
pub use postgres::PostgresAuthStorage;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteAuthStorage;

use crate::errors::StorageError;
use std::sync::Arc;
use std::time::Duration;

/// Storage backend configuration and factory
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    #[cfg(feature = "sqlite")]
    Sqlite(String), // Connection string/path
    #[cfg(feature = "postgres")]
    Postgres(String), // Connection string
}

/// Connection pool settings for the SQL backends
#[derive(Clone, Copy, Debug)]
pub struct StorageOptions {
    /// Upper bound on waiting for a pooled connection
    pub timeout: Duration,
    pub max_connections: u32,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            max_connections: 10,
        }
    }
}

/// Create a storage backend based on configuration
pub async fn create_storage_backend(
    backend: StorageBackend,
    options: StorageOptions,
) -> std::result::Result<Stores, StorageError> {
    match backend {
        StorageBackend::Memory => Ok(Stores::from_shared(Arc::new(MemoryAuthStorage::new()))),
        #[cfg(feature = "sqlite")]
        StorageBackend::Sqlite(database_url) => {
            let pool = sqlx::sqlite::SqlitePoolOptions::new()
                .max_connections(options.max_connections)
                .acquire_timeout(options.timeout)
                .connect(&database_url)
                .await
                .map_err(|e| {
                    StorageError::ConnectionFailed(format!("SQLite connection failed: {}", e))
                })?;

            let storage = sqlite::SqliteAuthStorage::new(pool);

            // Run migrations
            storage.migrate().await?;

            Ok(Stores::from_shared(Arc::new(storage)))
        }
        #[cfg(feature = "postgres")]
        StorageBackend::Postgres(database_url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(options.max_connections)
                .acquire_timeout(options.timeout)
                .connect(&database_url)
                .await
                .map_err(|e| {
                    StorageError::ConnectionFailed(format!("PostgreSQL connection failed: {}", e))
                })?;

            let storage = postgres::PostgresAuthStorage::new(pool);

            // Run migrations
            storage.migrate().await?;

            Ok(Stores::from_shared(Arc::new(storage)))
        }
    }
}

/// Parse storage backend from configuration string
pub fn parse_storage_backend(
    backend_name: &str,
    database_url: Option<&str>,
) -> std::result::Result<StorageBackend, StorageError> {
    match backend_name {
        "memory" => Ok(StorageBackend::Memory),
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let url = database_url.unwrap_or("sqlite:authservice.db?mode=rwc");
            Ok(StorageBackend::Sqlite(url.to_string()))
        }
        #[cfg(feature = "postgres")]
        "postgres" => {
            let url = database_url.ok_or_else(|| {
                StorageError::InvalidData("DATABASE_URL required for postgres backend".to_string())
            })?;
            Ok(StorageBackend::Postgres(url.to_string()))
        }
        _ => Err(StorageError::InvalidData(format!(
            "Unknown storage backend: {}",
            backend_name
        ))),
    }
}
