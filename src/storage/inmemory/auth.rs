//! In-memory storage for client identities and token records
//!
//! Enforces the same unique keys as the SQL migrations: `clients.address`,
//! `clients.client_id`, `access_tokens(client_id, address)`,
//! `access_tokens.access_token`, and `access_tokens.refresh_token`. Conflicting
//! inserts fail instead of silently overwriting.

use crate::auth::types::{ClientIdentity, TokenRecord};
use crate::errors::StorageError;
use crate::storage::traits::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory implementation for identity and token storage
#[derive(Default)]
pub struct MemoryAuthStorage {
    clients: Mutex<HashMap<String, ClientIdentity>>, // address -> identity
    access_tokens: Mutex<HashMap<TokenKey, TokenRecord>>,
}

/// (client_id, address) index for token records
type TokenKey = (String, String);

impl MemoryAuthStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn token_key(client_id: &str, address: &str) -> TokenKey {
        (client_id.to_string(), address.to_string())
    }

    /// Number of stored identities
    pub fn client_count(&self) -> Result<usize> {
        let clients = self
            .clients
            .lock()
            .map_err(|e| StorageError::DatabaseError(format!("Lock error: {}", e)))?;
        Ok(clients.len())
    }

    /// Number of stored token records
    pub fn token_count(&self) -> Result<usize> {
        let tokens = self
            .access_tokens
            .lock()
            .map_err(|e| StorageError::DatabaseError(format!("Lock error: {}", e)))?;
        Ok(tokens.len())
    }
}

#[async_trait]
impl ClientIdentityStore for MemoryAuthStorage {
    async fn find_by_address(&self, address: &str) -> Result<Option<ClientIdentity>> {
        let clients = self
            .clients
            .lock()
            .map_err(|e| StorageError::DatabaseError(format!("Lock error: {}", e)))?;
        Ok(clients.get(address).cloned())
    }

    async fn insert_identity(&self, identity: &ClientIdentity) -> Result<()> {
        let mut clients = self
            .clients
            .lock()
            .map_err(|e| StorageError::DatabaseError(format!("Lock error: {}", e)))?;

        if clients.contains_key(&identity.address) {
            return Err(StorageError::Conflict(format!(
                "Client already registered for address {}",
                identity.address
            )));
        }
        if clients.values().any(|c| c.client_id == identity.client_id) {
            return Err(StorageError::Conflict("Duplicate client id".to_string()));
        }

        clients.insert(identity.address.clone(), identity.clone());
        Ok(())
    }

    async fn identity_exists(&self, client_id: &str, address: &str) -> Result<bool> {
        let clients = self
            .clients
            .lock()
            .map_err(|e| StorageError::DatabaseError(format!("Lock error: {}", e)))?;
        Ok(clients
            .get(address)
            .is_some_and(|identity| identity.client_id == client_id))
    }
}

#[async_trait]
impl TokenRecordStore for MemoryAuthStorage {
    async fn find_by_client_and_address(
        &self,
        client_id: &str,
        address: &str,
    ) -> Result<Option<TokenRecord>> {
        let tokens = self
            .access_tokens
            .lock()
            .map_err(|e| StorageError::DatabaseError(format!("Lock error: {}", e)))?;
        Ok(tokens.get(&Self::token_key(client_id, address)).cloned())
    }

    async fn insert_token(&self, record: &TokenRecord) -> Result<()> {
        let mut tokens = self
            .access_tokens
            .lock()
            .map_err(|e| StorageError::DatabaseError(format!("Lock error: {}", e)))?;

        let key = Self::token_key(&record.client_id, &record.address);
        if tokens.contains_key(&key) {
            return Err(StorageError::Conflict(format!(
                "Token already issued for client at address {}",
                record.address
            )));
        }
        if tokens
            .values()
            .any(|t| t.access_token == record.access_token)
        {
            return Err(StorageError::Conflict("Duplicate access token".to_string()));
        }
        if tokens
            .values()
            .any(|t| t.refresh_token == record.refresh_token)
        {
            return Err(StorageError::Conflict("Duplicate refresh token".to_string()));
        }

        tokens.insert(key, record.clone());
        Ok(())
    }

    async fn token_exists(
        &self,
        access_token: &str,
        client_id: &str,
        address: &str,
    ) -> Result<bool> {
        let tokens = self
            .access_tokens
            .lock()
            .map_err(|e| StorageError::DatabaseError(format!("Lock error: {}", e)))?;
        Ok(tokens
            .get(&Self::token_key(client_id, address))
            .is_some_and(|record| record.access_token == access_token))
    }
}
