//! Shared fixtures for handler tests.

use async_trait::async_trait;
use std::sync::Arc;

use super::context::AppState;
use crate::auth::RandomTokenGenerator;
use crate::auth::types::{ClientIdentity, TokenRecord};
use crate::config::Config;
use crate::errors::StorageError;
use crate::storage::traits::{ClientIdentityStore, Result, Stores, TokenRecordStore};
use crate::storage::MemoryAuthStorage;

/// Store whose every call fails as if the database were unreachable
pub(crate) struct UnavailableStore;

#[async_trait]
impl ClientIdentityStore for UnavailableStore {
    async fn find_by_address(&self, _address: &str) -> Result<Option<ClientIdentity>> {
        Err(StorageError::ConnectionFailed("unavailable".to_string()))
    }

    async fn insert_identity(&self, _identity: &ClientIdentity) -> Result<()> {
        Err(StorageError::ConnectionFailed("unavailable".to_string()))
    }

    async fn identity_exists(&self, _client_id: &str, _address: &str) -> Result<bool> {
        Err(StorageError::ConnectionFailed("unavailable".to_string()))
    }
}

#[async_trait]
impl TokenRecordStore for UnavailableStore {
    async fn find_by_client_and_address(
        &self,
        _client_id: &str,
        _address: &str,
    ) -> Result<Option<TokenRecord>> {
        Err(StorageError::ConnectionFailed("unavailable".to_string()))
    }

    async fn insert_token(&self, _record: &TokenRecord) -> Result<()> {
        Err(StorageError::ConnectionFailed("unavailable".to_string()))
    }

    async fn token_exists(
        &self,
        _access_token: &str,
        _client_id: &str,
        _address: &str,
    ) -> Result<bool> {
        Err(StorageError::ConnectionFailed("unavailable".to_string()))
    }
}

pub(crate) fn create_test_config() -> Config {
    Config {
        version: "test".to_string(),
        http_port: "8080".to_string().try_into().unwrap(),
        storage_backend: "memory".to_string(),
        database_url: None,
        store_timeout: "5s".to_string().try_into().unwrap(),
        store_max_connections: "1".to_string().try_into().unwrap(),
    }
}

pub(crate) fn create_test_app_state() -> AppState {
    AppState::new(
        create_test_config(),
        Stores::from_shared(Arc::new(MemoryAuthStorage::new())),
        Arc::new(RandomTokenGenerator::new()),
    )
}

pub(crate) fn create_failing_app_state() -> AppState {
    AppState::new(
        create_test_config(),
        Stores::from_shared(Arc::new(UnavailableStore)),
        Arc::new(RandomTokenGenerator::new()),
    )
}
