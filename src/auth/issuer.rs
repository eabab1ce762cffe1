//! Access/refresh token issuance for registered clients.

use crate::auth::generator::TokenGenerator;
use crate::auth::types::{TOKEN_LENGTH, TokenRecord};
use crate::errors::IssuanceError;
use crate::storage::traits::{ClientIdentityStore, TokenRecordStore};
use std::sync::Arc;

/// Issues at most one token pair per (client_id, address)
pub struct TokenIssuer {
    identities: Arc<dyn ClientIdentityStore>,
    tokens: Arc<dyn TokenRecordStore>,
    generator: Arc<dyn TokenGenerator>,
}

impl TokenIssuer {
    pub fn new(
        identities: Arc<dyn ClientIdentityStore>,
        tokens: Arc<dyn TokenRecordStore>,
        generator: Arc<dyn TokenGenerator>,
    ) -> Self {
        Self {
            identities,
            tokens,
            generator,
        }
    }

    /// Return the token pair for a registered client, minting it on first request
    ///
    /// The client must have registered from `address`; a matching client id
    /// alone is not enough. An already issued record is returned unchanged.
    pub async fn issue_token(
        &self,
        client_id: &str,
        address: &str,
    ) -> Result<TokenRecord, IssuanceError> {
        if client_id.is_empty() {
            return Err(IssuanceError::InvalidRequest(
                "client_id is required".to_string(),
            ));
        }
        if address.is_empty() {
            return Err(IssuanceError::InvalidRequest(
                "address is required".to_string(),
            ));
        }

        if !self.identities.identity_exists(client_id, address).await? {
            tracing::warn!(address, "token requested by unknown client");
            return Err(IssuanceError::UnknownClient);
        }

        if let Some(existing) = self
            .tokens
            .find_by_client_and_address(client_id, address)
            .await?
        {
            tracing::debug!(address, "returning existing token");
            return Ok(existing);
        }

        let access_token = self.generator.generate(TOKEN_LENGTH)?;
        let refresh_token = self.generator.generate(TOKEN_LENGTH)?;
        let record = TokenRecord::new(client_id, address, access_token, refresh_token);
        self.tokens.insert_token(&record).await?;

        tracing::info!(address, "issued new token");
        Ok(record)
    }
}
