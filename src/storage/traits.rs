//! Storage trait definitions for client identities and issued tokens.
//!
//! Each trait is a narrow capability over one collection: point lookups,
//! single-record inserts, and existence counts. Backends are expected to
//! enforce the unique keys and report violations as `StorageError::Conflict`.

use crate::auth::types::{ClientIdentity, TokenRecord};
use crate::errors::StorageError;
use async_trait::async_trait;
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Collection of (client_id, address) records, unique by address
#[async_trait]
pub trait ClientIdentityStore: Send + Sync {
    /// Find the identity registered for an address
    async fn find_by_address(&self, address: &str) -> Result<Option<ClientIdentity>>;

    /// Store a new identity
    async fn insert_identity(&self, identity: &ClientIdentity) -> Result<()>;

    /// Whether an identity matches both the client id and the address
    async fn identity_exists(&self, client_id: &str, address: &str) -> Result<bool>;
}

/// Collection of issued token records, unique by (client_id, address)
#[async_trait]
pub trait TokenRecordStore: Send + Sync {
    /// Find the token record issued to a client at an address
    async fn find_by_client_and_address(
        &self,
        client_id: &str,
        address: &str,
    ) -> Result<Option<TokenRecord>>;

    /// Store a new token record
    async fn insert_token(&self, record: &TokenRecord) -> Result<()>;

    /// Whether a record matches the access token, client id, and address
    async fn token_exists(
        &self,
        access_token: &str,
        client_id: &str,
        address: &str,
    ) -> Result<bool>;
}

/// Shared handles to both collections of one backend
#[derive(Clone)]
pub struct Stores {
    pub identities: Arc<dyn ClientIdentityStore>,
    pub tokens: Arc<dyn TokenRecordStore>,
}

impl Stores {
    /// Use one backend instance for both collections
    pub fn from_shared<S>(storage: Arc<S>) -> Self
    where
        S: ClientIdentityStore + TokenRecordStore + 'static,
    {
        Self {
            identities: storage.clone(),
            tokens: storage,
        }
    }
}
