//! Client SDK for services that obtain and check credentials.
//!
//! The client id is cached on disk so a process keeps its identity across
//! restarts. Token validation is fail-closed: any error answers `false`.

use std::path::{Path, PathBuf};

use crate::auth::generator::{RandomTokenGenerator, TokenGenerator};
use crate::auth::types::{AccessTokenRequest, TokenRecord};
use crate::config::ClientConfig;
use crate::errors::ClientError;

/// Length of the `state` value sent with token requests
const STATE_LENGTH: usize = 50;

/// HTTP client for the authservice endpoints
#[derive(Clone, Debug)]
pub struct AuthServiceClient {
    http_client: reqwest::Client,
    base_url: url::Url,
    cache_path: PathBuf,
    max_attempts: usize,
    generator: RandomTokenGenerator,
}

impl AuthServiceClient {
    /// Build a client from configuration, with its own reqwest client
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(format!("authservice-client/{}", env!("CARGO_PKG_VERSION")))
            .timeout(*config.http_client_timeout.as_ref())
            .build()?;

        Ok(Self::with_http_client(
            http_client,
            config.base_url.as_ref().clone(),
            config.cache_path.clone(),
            *config.max_attempts.as_ref(),
        ))
    }

    pub fn with_http_client(
        http_client: reqwest::Client,
        base_url: url::Url,
        cache_path: PathBuf,
        max_attempts: usize,
    ) -> Self {
        Self {
            http_client,
            base_url,
            cache_path,
            max_attempts: max_attempts.max(1),
            generator: RandomTokenGenerator::new(),
        }
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    /// Return this process's client id, registering with the service if none is cached
    pub async fn client_id(&self) -> Result<String, ClientError> {
        if let Some(client_id) = self.read_cached_client_id().await? {
            return Ok(client_id);
        }

        let url = self.endpoint("/getclientid")?;
        let body = self
            .send_with_retries(&url, self.http_client.get(url.clone()))
            .await?;
        let client_id = body.trim().to_string();

        if let Some(parent) = self.cache_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.cache_path, &client_id).await?;
        tracing::debug!(cache_path = ?self.cache_path, "cached client id");

        Ok(client_id)
    }

    /// Forget the cached client id; a missing cache file is not an error
    pub async fn clear_cached_client_id(&self) -> Result<(), ClientError> {
        match tokio::fs::remove_file(&self.cache_path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Obtain the token pair for this client
    pub async fn access_token(&self) -> Result<TokenRecord, ClientError> {
        let client_id = self.client_id().await?;
        let state = self.generator.generate(STATE_LENGTH)?;

        let request = AccessTokenRequest {
            response_type: "code".to_string(),
            client_id,
            state,
            address: None,
        };

        let url = self.endpoint("/getaccesstoken")?;
        let body = self
            .send_with_retries(&url, self.http_client.post(url.clone()).json(&request))
            .await?;

        Ok(serde_json::from_str(&body)?)
    }

    /// Ask the service whether `record` is valid
    pub async fn validate_token(&self, record: &TokenRecord) -> bool {
        match self.try_validate_token(record).await {
            Ok(valid) => valid,
            Err(err) => {
                tracing::warn!(error = ?err, "token validation request failed");
                false
            }
        }
    }

    /// Validate a JSON-encoded token record; undecodable input is invalid
    pub async fn validate_token_str(&self, record: &str) -> bool {
        match serde_json::from_str::<TokenRecord>(record) {
            Ok(record) => self.validate_token(&record).await,
            Err(err) => {
                tracing::debug!(?err, "token record could not be decoded");
                false
            }
        }
    }

    async fn try_validate_token(&self, record: &TokenRecord) -> Result<bool, ClientError> {
        let url = self.endpoint("/authorise")?;
        let response = self.http_client.post(url.clone()).json(record).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus(status, url.to_string()));
        }

        Ok(response.text().await?.trim() == "true")
    }

    async fn read_cached_client_id(&self) -> Result<Option<String>, ClientError> {
        match tokio::fs::read_to_string(&self.cache_path).await {
            Ok(contents) => {
                let client_id = contents.trim();
                Ok((!client_id.is_empty()).then(|| client_id.to_string()))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Send `request` until a non-empty success body arrives
    ///
    /// Transport errors, server errors, and empty bodies are retried up to
    /// `max_attempts` times. A client error status is returned at once.
    async fn send_with_retries(
        &self,
        url: &url::Url,
        request: reqwest::RequestBuilder,
    ) -> Result<String, ClientError> {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            let Some(request) = request.try_clone() else {
                break;
            };

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_client_error() {
                        return Err(ClientError::UnexpectedStatus(status, url.to_string()));
                    }

                    let body = response.text().await?;
                    if status.is_success() && !body.trim().is_empty() {
                        return Ok(body);
                    }
                    tracing::debug!(attempt, %status, %url, "empty response from auth service");
                }
                Err(err) => {
                    tracing::debug!(attempt, ?err, %url, "auth service request failed");
                    last_error = Some(err);
                }
            }
        }

        match last_error {
            Some(err) => Err(err.into()),
            None => Err(ClientError::EmptyResponse(
                url.to_string(),
                self.max_attempts,
            )),
        }
    }
}
