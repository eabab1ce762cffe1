//! Standardized error types following the `error-authservice-<domain>-<number>` format.

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

/// Configuration errors that occur during application startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error when HTTP_PORT cannot be parsed
    #[error("error-authservice-config-1 Parsing HTTP_PORT into u16 failed: {0:?}")]
    PortParsingFailed(std::num::ParseIntError),

    /// Error when version information is not available
    #[error("error-authservice-config-2 One of GIT_HASH or CARGO_PKG_VERSION must be set")]
    VersionNotSet,

    /// Error when duration string cannot be parsed
    #[error("error-authservice-config-3 Failed to parse duration '{0}': {1}")]
    DurationParsingFailed(String, String),

    /// Error when a numeric setting cannot be parsed
    #[error("error-authservice-config-4 Failed to parse number '{0}': {1}")]
    NumberParsingFailed(String, std::num::ParseIntError),

    /// Error when a URL setting cannot be parsed
    #[error("error-authservice-config-5 Failed to parse URL '{0}': {1}")]
    UrlParsingFailed(String, url::ParseError),
}

/// HTTP server errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Error when request processing fails
    #[error("error-authservice-http-1 Request processing failed: {0}")]
    RequestProcessingFailed(String),
}

/// Database/storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Error when database connection fails
    #[error("error-authservice-storage-1 Database connection failed: {0}")]
    ConnectionFailed(String),

    /// Error when query execution fails
    #[error("error-authservice-storage-2 Query execution failed: {0}")]
    QueryFailed(String),

    /// Error when a write violates a uniqueness constraint
    #[error("error-authservice-storage-3 Constraint violation: {0}")]
    Conflict(String),

    /// Error when data validation fails
    #[error("error-authservice-storage-4 Invalid data: {0}")]
    InvalidData(String),

    /// Error when database operation fails
    #[error("error-authservice-storage-5 Database error: {0}")]
    DatabaseError(String),
}

/// Random string generation errors
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The underlying random source could not produce bytes
    #[error("error-authservice-generate-1 Random source failed: {0}")]
    RandomSourceFailed(String),
}

/// Client registration errors
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Caller address is empty
    #[error("error-authservice-registration-1 Caller address is required")]
    InvalidAddress,

    /// Client identifier could not be generated
    #[error("error-authservice-registration-2 Client identifier generation failed: {0}")]
    IdentifierGeneration(#[from] GenerateError),

    /// Identity store failed
    #[error("error-authservice-registration-3 Identity store failed: {0}")]
    Storage(#[from] StorageError),
}

/// Token issuance errors
#[derive(Debug, Error)]
pub enum IssuanceError {
    /// Request is missing a client id or address
    #[error("error-authservice-issuance-1 Invalid request: {0}")]
    InvalidRequest(String),

    /// No client identity matches the client id and address
    #[error("error-authservice-issuance-2 Unknown client")]
    UnknownClient,

    /// Access or refresh token could not be generated
    #[error("error-authservice-issuance-3 Token generation failed: {0}")]
    TokenGenerationFailed(#[from] GenerateError),

    /// Identity or token store failed
    #[error("error-authservice-issuance-4 Storage failure: {0}")]
    StorageFailure(#[from] StorageError),
}

/// Client SDK errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Error when the HTTP request could not be sent or read
    #[error("error-authservice-client-1 Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Error when the service answers with a non-success status
    #[error("error-authservice-client-2 Unexpected status {0} from {1}")]
    UnexpectedStatus(reqwest::StatusCode, String),

    /// Error when every attempt returned an empty body
    #[error("error-authservice-client-3 Empty response from {0} after {1} attempts")]
    EmptyResponse(String, usize),

    /// Error when a response body cannot be decoded
    #[error("error-authservice-client-4 Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// Error when the client id cache cannot be read or written
    #[error("error-authservice-client-5 Client id cache error: {0}")]
    CacheFailed(#[from] std::io::Error),

    /// Error when an endpoint URL cannot be built
    #[error("error-authservice-client-6 Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Error when the request state value cannot be generated
    #[error("error-authservice-client-7 State generation failed: {0}")]
    StateGenerationFailed(#[from] GenerateError),
}

pub type Result<T> = std::result::Result<T, HttpError>;

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self, "internal server error");
        (StatusCode::INTERNAL_SERVER_ERROR).into_response()
    }
}
