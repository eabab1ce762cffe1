//! SQLite storage implementations
//!
//! This module provides SQLite-based implementations of the storage traits.
//! SQLite is suitable for single-instance deployments and development.

mod access_tokens;
mod clients;

use crate::auth::types::{ClientIdentity, TokenRecord};
use crate::errors::StorageError;
use crate::storage::traits::*;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;

pub use access_tokens::SqliteAccessTokenStore;
pub use clients::SqliteClientIdentityStore;

/// Map an insert failure, reporting unique key violations as conflicts
pub(crate) fn map_write_error(error: sqlx::Error) -> StorageError {
    match &error {
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            StorageError::Conflict(db_error.message().to_string())
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StorageError::ConnectionFailed(error.to_string())
        }
        _ => StorageError::DatabaseError(error.to_string()),
    }
}

/// SQLite identity and token storage
pub struct SqliteAuthStorage {
    pool: SqlitePool,
    client_store: Arc<SqliteClientIdentityStore>,
    access_token_store: Arc<SqliteAccessTokenStore>,
}

impl SqliteAuthStorage {
    /// Create a new SQLite storage instance
    pub fn new(pool: SqlitePool) -> Self {
        let client_store = Arc::new(SqliteClientIdentityStore::new(pool.clone()));
        let access_token_store = Arc::new(SqliteAccessTokenStore::new(pool.clone()));

        Self {
            pool,
            client_store,
            access_token_store,
        }
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations/sqlite")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(format!("Migration failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl ClientIdentityStore for SqliteAuthStorage {
    async fn find_by_address(&self, address: &str) -> Result<Option<ClientIdentity>> {
        self.client_store.find_by_address(address).await
    }

    async fn insert_identity(&self, identity: &ClientIdentity) -> Result<()> {
        self.client_store.insert_identity(identity).await
    }

    async fn identity_exists(&self, client_id: &str, address: &str) -> Result<bool> {
        self.client_store.identity_exists(client_id, address).await
    }
}

#[async_trait]
impl TokenRecordStore for SqliteAuthStorage {
    async fn find_by_client_and_address(
        &self,
        client_id: &str,
        address: &str,
    ) -> Result<Option<TokenRecord>> {
        self.access_token_store
            .find_by_client_and_address(client_id, address)
            .await
    }

    async fn insert_token(&self, record: &TokenRecord) -> Result<()> {
        self.access_token_store.insert_token(record).await
    }

    async fn token_exists(
        &self,
        access_token: &str,
        client_id: &str,
        address: &str,
    ) -> Result<bool> {
        self.access_token_store
            .token_exists(access_token, client_id, address)
            .await
    }
}
