//! SQLite implementation for client identity storage

use crate::auth::types::ClientIdentity;
use crate::errors::StorageError;
use crate::storage::traits::{ClientIdentityStore, Result};
use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqliteRow};

use super::map_write_error;

/// SQLite implementation of client identity storage
pub struct SqliteClientIdentityStore {
    pool: SqlitePool,
}

impl SqliteClientIdentityStore {
    /// Create a new SQLite client identity store
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Convert SQLite row to ClientIdentity
    fn row_to_identity(row: &SqliteRow) -> Result<ClientIdentity> {
        Ok(ClientIdentity {
            client_id: row.try_get("client_id").map_err(|e| {
                StorageError::DatabaseError(format!("Failed to get client_id: {}", e))
            })?,
            address: row.try_get("address").map_err(|e| {
                StorageError::DatabaseError(format!("Failed to get address: {}", e))
            })?,
        })
    }
}

#[async_trait]
impl ClientIdentityStore for SqliteClientIdentityStore {
    async fn find_by_address(&self, address: &str) -> Result<Option<ClientIdentity>> {
        let row = sqlx::query("SELECT client_id, address FROM clients WHERE address = ?")
            .bind(address)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        row.as_ref().map(Self::row_to_identity).transpose()
    }

    async fn insert_identity(&self, identity: &ClientIdentity) -> Result<()> {
        sqlx::query("INSERT INTO clients (client_id, address) VALUES (?, ?)")
            .bind(&identity.client_id)
            .bind(&identity.address)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(())
    }

    async fn identity_exists(&self, client_id: &str, address: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE client_id = ? AND address = ?")
                .bind(client_id)
                .bind(address)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        Ok(count > 0)
    }
}
