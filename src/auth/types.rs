//! Credential records exchanged between callers, services, and stores.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of generated client identifiers
pub const CLIENT_ID_LENGTH: usize = 50;

/// Length of generated access and refresh tokens
pub const TOKEN_LENGTH: usize = 50;

/// Token type recorded on every issued token
pub const TOKEN_TYPE: &str = "token";

/// Lifetime recorded on every issued token, in seconds
pub const TOKEN_EXPIRES_IN_SECONDS: i64 = 600;

/// A client identifier bound to the network address that registered it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    /// Opaque, unique client identifier
    pub client_id: String,
    /// Network origin; at most one identity exists per address
    pub address: String,
}

impl ClientIdentity {
    pub fn new(client_id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            address: address.into(),
        }
    }
}

/// An issued access/refresh token pair for one (client_id, address) pair
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub client_id: String,
    pub address: String,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds. Recorded only; nothing enforces it.
    #[serde(default)]
    pub expires: i64,
}

impl TokenRecord {
    /// Build a freshly minted record with the standard type and lifetime
    pub fn new(
        client_id: impl Into<String>,
        address: impl Into<String>,
        access_token: String,
        refresh_token: String,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            address: address.into(),
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE.to_string(),
            expires: TOKEN_EXPIRES_IN_SECONDS,
        }
    }
}

impl fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRecord")
            .field("client_id", &self.client_id)
            .field("address", &self.address)
            .field("access_token", &"[redacted]")
            .field("refresh_token", &"[redacted]")
            .field("token_type", &self.token_type)
            .field("expires", &self.expires)
            .finish()
    }
}

/// Token request as sent by clients
///
/// `response_type` and `state` are accepted for compatibility and carry no
/// meaning. An absent `address` is filled in from the caller's connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessTokenRequest {
    #[serde(default)]
    pub response_type: String,
    pub client_id: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl AccessTokenRequest {
    /// Address to issue against, falling back to the caller's address
    pub fn address_or<'a>(&'a self, caller: &'a str) -> &'a str {
        match self.address.as_deref() {
            Some(address) if !address.is_empty() => address,
            _ => caller,
        }
    }
}
