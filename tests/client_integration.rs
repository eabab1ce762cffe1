//! Client SDK tests against a live server on an ephemeral port.

use authservice::auth::RandomTokenGenerator;
use authservice::client::AuthServiceClient;
use authservice::config::Config;
use authservice::http::{AppState, build_router};
use authservice::storage::{MemoryAuthStorage, Stores};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Start a server on 127.0.0.1 and return its base URL
async fn spawn_server() -> url::Url {
    let config = Config {
        version: "test".to_string(),
        http_port: "0".to_string().try_into().unwrap(),
        storage_backend: "memory".to_string(),
        database_url: None,
        store_timeout: "5s".to_string().try_into().unwrap(),
        store_max_connections: "1".to_string().try_into().unwrap(),
    };
    let state = AppState::new(
        config,
        Stores::from_shared(Arc::new(MemoryAuthStorage::new())),
        Arc::new(RandomTokenGenerator::new()),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            build_router(state).into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    url::Url::parse(&format!("http://{address}")).unwrap()
}

fn client(base_url: url::Url, cache_path: PathBuf) -> AuthServiceClient {
    AuthServiceClient::with_http_client(reqwest::Client::new(), base_url, cache_path, 10)
}

#[tokio::test]
async fn test_client_id_is_cached_and_stable() {
    let base_url = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("data").join("clientid");
    let client = client(base_url, cache_path.clone());

    let first = client.client_id().await.unwrap();
    assert_eq!(first.len(), 50);
    assert_eq!(std::fs::read_to_string(&cache_path).unwrap(), first);

    // Served from the cache file
    assert_eq!(client.client_id().await.unwrap(), first);

    // The service returns the same id once the cache is gone
    client.clear_cached_client_id().await.unwrap();
    assert!(!cache_path.exists());
    assert_eq!(client.client_id().await.unwrap(), first);
}

#[tokio::test]
async fn test_access_token_round_trip() {
    let base_url = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client(base_url, dir.path().join("clientid"));

    let record = client.access_token().await.unwrap();
    assert_eq!(record.client_id, client.client_id().await.unwrap());
    assert_eq!(record.address, "127.0.0.1");
    assert_eq!(record.token_type, "token");

    assert_eq!(client.access_token().await.unwrap(), record);

    assert!(client.validate_token(&record).await);
    assert!(
        client
            .validate_token_str(&serde_json::to_string(&record).unwrap())
            .await
    );

    let mut tampered = record.clone();
    tampered.access_token = "tampered".to_string();
    assert!(!client.validate_token(&tampered).await);
    assert!(!client.validate_token_str("{}").await);
}

#[tokio::test]
async fn test_stale_cached_id_is_rejected() {
    let base_url = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("clientid");
    std::fs::write(&cache_path, "stale-client-id").unwrap();

    let client = client(base_url, cache_path);
    let result = client.access_token().await;
    assert!(matches!(
        result,
        Err(authservice::errors::ClientError::UnexpectedStatus(status, _))
            if status == reqwest::StatusCode::UNAUTHORIZED
    ));
}
