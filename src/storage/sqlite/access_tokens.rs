//! SQLite implementation for access token storage

use crate::auth::types::TokenRecord;
use crate::errors::StorageError;
use crate::storage::traits::{Result, TokenRecordStore};
use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqliteRow};

use super::map_write_error;

/// SQLite implementation of access token storage
pub struct SqliteAccessTokenStore {
    pool: SqlitePool,
}

impl SqliteAccessTokenStore {
    /// Create a new SQLite access token store
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Convert SQLite row to TokenRecord
    fn row_to_token_record(row: &SqliteRow) -> Result<TokenRecord> {
        Ok(TokenRecord {
            client_id: row.try_get("client_id").map_err(|e| {
                StorageError::DatabaseError(format!("Failed to get client_id: {}", e))
            })?,
            address: row.try_get("address").map_err(|e| {
                StorageError::DatabaseError(format!("Failed to get address: {}", e))
            })?,
            access_token: row.try_get("access_token").map_err(|e| {
                StorageError::DatabaseError(format!("Failed to get access_token: {}", e))
            })?,
            refresh_token: row.try_get("refresh_token").map_err(|e| {
                StorageError::DatabaseError(format!("Failed to get refresh_token: {}", e))
            })?,
            token_type: row.try_get("token_type").map_err(|e| {
                StorageError::DatabaseError(format!("Failed to get token_type: {}", e))
            })?,
            expires: row.try_get("expires").map_err(|e| {
                StorageError::DatabaseError(format!("Failed to get expires: {}", e))
            })?,
        })
    }
}

#[async_trait]
impl TokenRecordStore for SqliteAccessTokenStore {
    async fn find_by_client_and_address(
        &self,
        client_id: &str,
        address: &str,
    ) -> Result<Option<TokenRecord>> {
        let row = sqlx::query(
            r#"
            SELECT client_id, address, access_token, refresh_token, token_type, expires
            FROM access_tokens
            WHERE client_id = ? AND address = ?
            "#,
        )
        .bind(client_id)
        .bind(address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        row.as_ref().map(Self::row_to_token_record).transpose()
    }

    async fn insert_token(&self, record: &TokenRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO access_tokens (
                client_id, address, access_token, refresh_token, token_type, expires
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.client_id)
        .bind(&record.address)
        .bind(&record.access_token)
        .bind(&record.refresh_token)
        .bind(&record.token_type)
        .bind(record.expires)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn token_exists(
        &self,
        access_token: &str,
        client_id: &str,
        address: &str,
    ) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM access_tokens
            WHERE access_token = ? AND client_id = ? AND address = ?
            "#,
        )
        .bind(access_token)
        .bind(client_id)
        .bind(address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        Ok(count > 0)
    }
}
