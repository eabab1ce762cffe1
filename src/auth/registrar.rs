//! Client identity registration keyed by caller address.

use crate::auth::generator::TokenGenerator;
use crate::auth::types::{CLIENT_ID_LENGTH, ClientIdentity};
use crate::errors::RegistrationError;
use crate::storage::traits::ClientIdentityStore;
use std::sync::Arc;

/// Hands out one stable client identifier per network address
pub struct ClientRegistrar {
    identities: Arc<dyn ClientIdentityStore>,
    generator: Arc<dyn TokenGenerator>,
}

impl ClientRegistrar {
    pub fn new(
        identities: Arc<dyn ClientIdentityStore>,
        generator: Arc<dyn TokenGenerator>,
    ) -> Self {
        Self {
            identities,
            generator,
        }
    }

    /// Return the client id registered for `address`, creating one on first contact
    ///
    /// Repeated calls from the same address yield the same identifier. A store
    /// failure returns an error and no identifier; nothing is retried here.
    pub async fn register_client(&self, address: &str) -> Result<String, RegistrationError> {
        if address.is_empty() {
            return Err(RegistrationError::InvalidAddress);
        }

        if let Some(identity) = self.identities.find_by_address(address).await? {
            tracing::debug!(address, "returning existing client id");
            return Ok(identity.client_id);
        }

        let client_id = self.generator.generate(CLIENT_ID_LENGTH)?;
        let identity = ClientIdentity::new(client_id, address);
        self.identities.insert_identity(&identity).await?;

        tracing::info!(address, "registered new client");
        Ok(identity.client_id)
    }
}
