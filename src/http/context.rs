//! Application state shared by all request handlers.

use axum::extract::FromRef;
use std::sync::Arc;

use crate::auth::{ClientRegistrar, TokenGenerator, TokenIssuer, TokenValidator};
use crate::config::Config;
use crate::storage::Stores;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Hands out client ids keyed by caller address
    pub registrar: Arc<ClientRegistrar>,
    /// Mints or returns token pairs for registered clients
    pub issuer: Arc<TokenIssuer>,
    pub validator: Arc<TokenValidator>,
}

impl AppState {
    /// Wire the credential services to one set of stores and a generator
    pub fn new(config: Config, stores: Stores, generator: Arc<dyn TokenGenerator>) -> Self {
        let registrar = ClientRegistrar::new(stores.identities.clone(), generator.clone());
        let issuer = TokenIssuer::new(stores.identities, stores.tokens.clone(), generator);
        let validator = TokenValidator::new(stores.tokens);

        Self {
            config: Arc::new(config),
            registrar: Arc::new(registrar),
            issuer: Arc::new(issuer),
            validator: Arc::new(validator),
        }
    }
}

impl FromRef<AppState> for Arc<TokenValidator> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.validator.clone()
    }
}
