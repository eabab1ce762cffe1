//! PostgreSQL implementation for client identity storage

use crate::auth::types::ClientIdentity;
use crate::errors::StorageError;
use crate::storage::traits::{ClientIdentityStore, Result};
use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};

use super::map_write_error;

/// PostgreSQL implementation of client identity storage
pub struct PostgresClientIdentityStore {
    pool: PgPool,
}

impl PostgresClientIdentityStore {
    /// Create a new PostgreSQL client identity store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert PostgreSQL row to ClientIdentity
    fn row_to_identity(row: &PgRow) -> Result<ClientIdentity> {
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
impl ClientIdentityStore for PostgresClientIdentityStore {
    async fn find_by_address(&self, address: &str) -> Result<Option<ClientIdentity>> {
        let row = sqlx::query("SELECT client_id, address FROM clients WHERE address = $1")
            .bind(address)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        row.as_ref().map(Self::row_to_identity).transpose()
    }

    async fn insert_identity(&self, identity: &ClientIdentity) -> Result<()> {
        sqlx::query("INSERT INTO clients (client_id, address) VALUES ($1, $2)")
            .bind(&identity.client_id)
            .bind(&identity.address)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(())
    }

    async fn identity_exists(&self, client_id: &str, address: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE client_id = $1 AND address = $2")
                .bind(client_id)
                .bind(address)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        Ok(count > 0)
    }
}
