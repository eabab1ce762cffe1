//! Environment-based configuration for the authservice server and client.

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::ConfigError;
use crate::storage::StorageOptions;

/// HTTP server port configuration
#[derive(Clone, Debug)]
pub struct HttpPort(u16);

/// Upper bound on waiting for a store connection
#[derive(Clone, Debug)]
pub struct StoreTimeout(Duration);

/// SQL connection pool size
#[derive(Clone, Debug)]
pub struct StoreMaxConnections(u32);

/// HTTP client timeout configuration
#[derive(Clone, Debug)]
pub struct HttpClientTimeout(Duration);

/// Base URL of the auth service as seen by clients
#[derive(Clone, Debug)]
pub struct ServiceUrl(url::Url);

/// Number of attempts the client makes before giving up on an empty response
#[derive(Clone, Debug)]
pub struct MaxAttempts(usize);

/// Server configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub version: String,
    pub http_port: HttpPort,
    pub storage_backend: String,
    pub database_url: Option<String>,
    pub store_timeout: StoreTimeout,
    pub store_max_connections: StoreMaxConnections,
}

impl Config {
    /// Create a new configuration from environment variables
    pub fn new() -> Result<Self> {
        let http_port: HttpPort = default_env("HTTP_PORT", "8080").try_into()?;
        let storage_backend = default_env("STORAGE_BACKEND", "memory");
        let database_url = optional_env("DATABASE_URL").filter(|value| !value.is_empty());
        let store_timeout: StoreTimeout = default_env("STORE_TIMEOUT", "5s").try_into()?;
        let store_max_connections: StoreMaxConnections =
            default_env("STORE_MAX_CONNECTIONS", "10").try_into()?;

        Ok(Self {
            version: version()?,
            http_port,
            storage_backend,
            database_url,
            store_timeout,
            store_max_connections,
        })
    }

    /// Pool settings for the configured storage backend
    pub fn storage_options(&self) -> StorageOptions {
        StorageOptions {
            timeout: *self.store_timeout.as_ref(),
            max_connections: *self.store_max_connections.as_ref(),
        }
    }
}

/// Client SDK and CLI configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: ServiceUrl,
    /// File holding the client id between runs
    pub cache_path: PathBuf,
    pub http_client_timeout: HttpClientTimeout,
    pub max_attempts: MaxAttempts,
}

impl ClientConfig {
    /// Create a new client configuration from environment variables
    pub fn new() -> Result<Self> {
        let base_url: ServiceUrl =
            default_env("AUTH_SERVICE_URL", "http://127.0.0.1:8080").try_into()?;
        let cache_path = PathBuf::from(default_env("CLIENT_ID_CACHE_PATH", "/data/clientid"));
        let http_client_timeout: HttpClientTimeout =
            default_env("HTTP_CLIENT_TIMEOUT", "10s").try_into()?;
        let max_attempts: MaxAttempts = default_env("CLIENT_MAX_ATTEMPTS", "10").try_into()?;

        Ok(Self {
            base_url,
            cache_path,
            http_client_timeout,
            max_attempts,
        })
    }
}

/// Get application version from build environment
pub fn version() -> Result<String> {
    option_env!("GIT_HASH")
        .or(option_env!("CARGO_PKG_VERSION"))
        .map(|val| val.to_string())
        .ok_or(ConfigError::VersionNotSet.into())
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn default_env(name: &str, default_value: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default_value.to_string())
}

fn parse_duration(value: String) -> Result<Duration, ConfigError> {
    duration_str::parse(&value).map_err(|e| ConfigError::DurationParsingFailed(value, e.to_string()))
}

impl TryFrom<String> for HttpPort {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Ok(Self(8080))
        } else {
            value
                .parse::<u16>()
                .map(Self)
                .map_err(|err| ConfigError::PortParsingFailed(err).into())
        }
    }
}

impl AsRef<u16> for HttpPort {
    fn as_ref(&self) -> &u16 {
        &self.0
    }
}

impl TryFrom<String> for StoreTimeout {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Ok(Self(Duration::from_secs(5)));
        }
        parse_duration(value).map(Self)
    }
}

impl AsRef<Duration> for StoreTimeout {
    fn as_ref(&self) -> &Duration {
        &self.0
    }
}

impl TryFrom<String> for StoreMaxConnections {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Ok(Self(10));
        }
        value
            .parse::<u32>()
            .map(Self)
            .map_err(|err| ConfigError::NumberParsingFailed(value, err))
    }
}

impl AsRef<u32> for StoreMaxConnections {
    fn as_ref(&self) -> &u32 {
        &self.0
    }
}

impl TryFrom<String> for HttpClientTimeout {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Ok(Self(Duration::from_secs(10)));
        }
        parse_duration(value).map(Self)
    }
}

impl AsRef<Duration> for HttpClientTimeout {
    fn as_ref(&self) -> &Duration {
        &self.0
    }
}

impl TryFrom<String> for ServiceUrl {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        url::Url::parse(&value)
            .map(Self)
            .map_err(|err| ConfigError::UrlParsingFailed(value, err))
    }
}

impl AsRef<url::Url> for ServiceUrl {
    fn as_ref(&self) -> &url::Url {
        &self.0
    }
}

impl TryFrom<String> for MaxAttempts {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Ok(Self(10));
        }
        // Zero attempts would never reach the service.
        value
            .parse::<usize>()
            .map(|attempts| Self(attempts.max(1)))
            .map_err(|err| ConfigError::NumberParsingFailed(value, err))
    }
}

impl AsRef<usize> for MaxAttempts {
    fn as_ref(&self) -> &usize {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_port_parsing() {
        let port: HttpPort = "3000".to_string().try_into().unwrap();
        assert_eq!(*port.as_ref(), 3000);

        let port: HttpPort = "".to_string().try_into().unwrap();
        assert_eq!(*port.as_ref(), 8080);

        assert!(HttpPort::try_from("not-a-port".to_string()).is_err());
        assert!(HttpPort::try_from("70000".to_string()).is_err());
    }

    #[test]
    fn test_store_timeout_parsing() {
        let timeout: StoreTimeout = "5s".to_string().try_into().unwrap();
        assert_eq!(*timeout.as_ref(), Duration::from_secs(5));

        let timeout: StoreTimeout = "2m".to_string().try_into().unwrap();
        assert_eq!(*timeout.as_ref(), Duration::from_secs(120));

        let result = StoreTimeout::try_from("soon".to_string());
        assert!(matches!(
            result,
            Err(ConfigError::DurationParsingFailed(value, _)) if value == "soon"
        ));
    }

    #[test]
    fn test_store_max_connections_parsing() {
        let max: StoreMaxConnections = "25".to_string().try_into().unwrap();
        assert_eq!(*max.as_ref(), 25);

        assert!(matches!(
            StoreMaxConnections::try_from("-1".to_string()),
            Err(ConfigError::NumberParsingFailed(_, _))
        ));
    }

    #[test]
    fn test_max_attempts_never_zero() {
        let attempts: MaxAttempts = "0".to_string().try_into().unwrap();
        assert_eq!(*attempts.as_ref(), 1);

        let attempts: MaxAttempts = "".to_string().try_into().unwrap();
        assert_eq!(*attempts.as_ref(), 10);
    }

    #[test]
    fn test_service_url_parsing() {
        let url: ServiceUrl = "http://authservice:8080".to_string().try_into().unwrap();
        assert_eq!(url.as_ref().host_str(), Some("authservice"));

        assert!(matches!(
            ServiceUrl::try_from("authservice".to_string()),
            Err(ConfigError::UrlParsingFailed(_, _))
        ));
    }

    #[test]
    fn test_storage_options_from_config() {
        let config = Config {
            version: "test".to_string(),
            http_port: "8080".to_string().try_into().unwrap(),
            storage_backend: "memory".to_string(),
            database_url: None,
            store_timeout: "3s".to_string().try_into().unwrap(),
            store_max_connections: "4".to_string().try_into().unwrap(),
        };

        let options = config.storage_options();
        assert_eq!(options.timeout, Duration::from_secs(3));
        assert_eq!(options.max_connections, 4);
    }

    #[test]
    fn test_version_is_set() {
        assert!(!version().unwrap().is_empty());
    }
}
