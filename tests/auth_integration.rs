//! Credential lifecycle tests against the in-memory store.
//!
//! These walk the register → issue → validate flow the way a caller would,
//! including the failure modes where a store or the random source breaks.

use async_trait::async_trait;
use authservice::auth::types::{ClientIdentity, TokenRecord};
use authservice::auth::{ClientRegistrar, RandomTokenGenerator, TokenIssuer, TokenValidator};
use authservice::errors::{IssuanceError, RegistrationError, StorageError};
use authservice::storage::traits::{ClientIdentityStore, Result, TokenRecordStore};
use authservice::storage::MemoryAuthStorage;
use std::sync::Arc;

struct Services {
    storage: Arc<MemoryAuthStorage>,
    registrar: ClientRegistrar,
    issuer: TokenIssuer,
    validator: TokenValidator,
}

fn services() -> Services {
    let storage = Arc::new(MemoryAuthStorage::new());
    let generator = Arc::new(RandomTokenGenerator::new());
    Services {
        registrar: ClientRegistrar::new(storage.clone(), generator.clone()),
        issuer: TokenIssuer::new(storage.clone(), storage.clone(), generator),
        validator: TokenValidator::new(storage.clone()),
        storage,
    }
}

/// Token store that is reachable for writes but fails every read
struct ReadFailingTokens;

#[async_trait]
impl TokenRecordStore for ReadFailingTokens {
    async fn find_by_client_and_address(
        &self,
        _client_id: &str,
        _address: &str,
    ) -> Result<Option<TokenRecord>> {
        Err(StorageError::QueryFailed("read timeout".to_string()))
    }

    async fn insert_token(&self, _record: &TokenRecord) -> Result<()> {
        Ok(())
    }

    async fn token_exists(
        &self,
        _access_token: &str,
        _client_id: &str,
        _address: &str,
    ) -> Result<bool> {
        Err(StorageError::QueryFailed("read timeout".to_string()))
    }
}

/// Identity store whose connection is gone
struct DisconnectedIdentities;

#[async_trait]
impl ClientIdentityStore for DisconnectedIdentities {
    async fn find_by_address(&self, _address: &str) -> Result<Option<ClientIdentity>> {
        Err(StorageError::ConnectionFailed("connection reset".to_string()))
    }

    async fn insert_identity(&self, _identity: &ClientIdentity) -> Result<()> {
        Err(StorageError::ConnectionFailed("connection reset".to_string()))
    }

    async fn identity_exists(&self, _client_id: &str, _address: &str) -> Result<bool> {
        Err(StorageError::ConnectionFailed("connection reset".to_string()))
    }
}

#[tokio::test]
async fn test_complete_credential_flow() {
    let services = services();

    // Step 1: register the caller's address
    let client_id = services.registrar.register_client("1.2.3.4").await.unwrap();
    assert_eq!(client_id.len(), 50);

    // Step 2: exchange the client id for a token pair
    let record = services
        .issuer
        .issue_token(&client_id, "1.2.3.4")
        .await
        .unwrap();
    assert_eq!(record.client_id, client_id);
    assert_eq!(record.address, "1.2.3.4");
    assert_eq!(record.access_token.len(), 50);
    assert_eq!(record.refresh_token.len(), 50);
    assert_eq!(record.token_type, "token");
    assert_eq!(record.expires, 600);

    // Step 3: the issued record validates
    assert!(services.validator.validate(&record).await);

    // Step 4: repeating every step changes nothing
    assert_eq!(
        services.registrar.register_client("1.2.3.4").await.unwrap(),
        client_id
    );
    assert_eq!(
        services
            .issuer
            .issue_token(&client_id, "1.2.3.4")
            .await
            .unwrap(),
        record
    );
    assert_eq!(services.storage.client_count().unwrap(), 1);
    assert_eq!(services.storage.token_count().unwrap(), 1);
}

#[tokio::test]
async fn test_unregistered_client_gets_nothing() {
    let services = services();

    let result = services.issuer.issue_token("unknown-id", "9.9.9.9").await;
    assert!(matches!(result, Err(IssuanceError::UnknownClient)));
    assert_eq!(services.storage.token_count().unwrap(), 0);
}

#[tokio::test]
async fn test_token_is_bound_to_address_and_client() {
    let services = services();

    let client_a = services.registrar.register_client("1.2.3.4").await.unwrap();
    let client_b = services.registrar.register_client("5.6.7.8").await.unwrap();
    assert_ne!(client_a, client_b);

    let record_a = services
        .issuer
        .issue_token(&client_a, "1.2.3.4")
        .await
        .unwrap();
    let record_b = services
        .issuer
        .issue_token(&client_b, "5.6.7.8")
        .await
        .unwrap();
    assert_ne!(record_a.access_token, record_b.access_token);

    // A's token presented from B's address, or under B's id, is rejected
    let mut moved = record_a.clone();
    moved.address = record_b.address.clone();
    assert!(!services.validator.validate(&moved).await);

    let mut borrowed = record_a.clone();
    borrowed.client_id = client_b.clone();
    assert!(!services.validator.validate(&borrowed).await);

    // A client id cannot be used from an address it did not register from
    let result = services.issuer.issue_token(&client_a, "5.6.7.8").await;
    assert!(matches!(result, Err(IssuanceError::UnknownClient)));
}

#[tokio::test]
async fn test_validation_fails_closed_on_store_errors() {
    let validator = TokenValidator::new(Arc::new(ReadFailingTokens));
    let record = TokenRecord::new("client", "1.2.3.4", "token".to_string(), String::new());

    assert!(!validator.validate(&record).await);
}

#[tokio::test]
async fn test_store_failures_surface_as_errors() {
    let generator = Arc::new(RandomTokenGenerator::new());

    let registrar = ClientRegistrar::new(Arc::new(DisconnectedIdentities), generator.clone());
    assert!(matches!(
        registrar.register_client("1.2.3.4").await,
        Err(RegistrationError::Storage(StorageError::ConnectionFailed(_)))
    ));

    let issuer = TokenIssuer::new(
        Arc::new(DisconnectedIdentities),
        Arc::new(ReadFailingTokens),
        generator.clone(),
    );
    assert!(matches!(
        issuer.issue_token("client", "1.2.3.4").await,
        Err(IssuanceError::StorageFailure(StorageError::ConnectionFailed(_)))
    ));

    // Identity confirmed, token lookup fails
    let storage = Arc::new(MemoryAuthStorage::new());
    storage
        .insert_identity(&ClientIdentity::new("client", "1.2.3.4"))
        .await
        .unwrap();
    let issuer = TokenIssuer::new(storage, Arc::new(ReadFailingTokens), generator);
    assert!(matches!(
        issuer.issue_token("client", "1.2.3.4").await,
        Err(IssuanceError::StorageFailure(StorageError::QueryFailed(_)))
    ));
}

#[tokio::test]
async fn test_concurrent_registration_yields_one_identity() {
    let services = Arc::new(services());

    let handles = (0..8)
        .map(|_| {
            let services = services.clone();
            tokio::spawn(async move { services.registrar.register_client("1.2.3.4").await })
        })
        .collect::<Vec<_>>();

    let results = futures::future::join_all(handles).await;
    let ids = results
        .into_iter()
        .filter_map(|joined| joined.unwrap().ok())
        .collect::<Vec<_>>();

    // Losers of the insert race fail; every winner agrees on one id
    assert!(!ids.is_empty());
    assert!(ids.iter().all(|id| id == &ids[0]));
    assert_eq!(services.storage.client_count().unwrap(), 1);
}
