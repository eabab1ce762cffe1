//! Handles GET /api/whoami - Token-protected endpoint echoing the caller's identity

use axum::Json;

use super::middleware_auth::AuthorisedClient;
use crate::auth::types::ClientIdentity;

/// GET /api/whoami - Returns the client id and address the token is bound to
pub async fn handle_whoami(AuthorisedClient(identity): AuthorisedClient) -> Json<ClientIdentity> {
    tracing::debug!(address = %identity.address, "whoami");
    Json(identity)
}
