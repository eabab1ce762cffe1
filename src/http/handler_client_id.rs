//! Handles GET /getclientid - Returns the client id bound to the caller's address

use axum::extract::{ConnectInfo, State};
use std::net::SocketAddr;

use super::context::AppState;
use crate::errors::{HttpError, Result};

/// Handle client id requests
/// GET /getclientid - Registers the caller's IP on first contact and returns its client id
pub async fn handle_get_client_id(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Result<String> {
    let address = peer.ip().to_string();

    state
        .registrar
        .register_client(&address)
        .await
        .map_err(|e| HttpError::RequestProcessingFailed(e.to_string()))
}
