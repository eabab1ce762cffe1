//! Fail-closed validation of presented token records.

use crate::auth::types::TokenRecord;
use crate::storage::traits::TokenRecordStore;
use std::sync::Arc;

/// Checks presented records against the token store
pub struct TokenValidator {
    tokens: Arc<dyn TokenRecordStore>,
}

impl TokenValidator {
    pub fn new(tokens: Arc<dyn TokenRecordStore>) -> Self {
        Self { tokens }
    }

    /// Whether a stored record matches the access token, client id, and address
    ///
    /// refresh_token, token_type, and expires are not compared. A store
    /// failure counts as invalid.
    pub async fn validate(&self, record: &TokenRecord) -> bool {
        if record.access_token.is_empty() || record.client_id.is_empty() || record.address.is_empty()
        {
            return false;
        }

        match self
            .tokens
            .token_exists(&record.access_token, &record.client_id, &record.address)
            .await
        {
            Ok(valid) => valid,
            Err(err) => {
                tracing::warn!(error = ?err, address = %record.address, "token validation failed closed");
                false
            }
        }
    }
}
