//! Handles GET|POST /getaccesstoken - Exchanges a registered client id for a token pair

use axum::{
    Json,
    body::Bytes,
    extract::{ConnectInfo, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use super::context::AppState;
use crate::auth::types::{AccessTokenRequest, TokenRecord};
use crate::errors::{HttpError, IssuanceError};

/// Handle access token requests
///
/// The body is an `AccessTokenRequest`. When it carries no address the caller's
/// IP is used. Failures answer with an empty body.
pub async fn handle_get_access_token(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    body: Bytes,
) -> Result<Json<TokenRecord>, Response> {
    let request: AccessTokenRequest = serde_json::from_slice(&body).map_err(|err| {
        tracing::debug!(?err, "malformed access token request");
        StatusCode::BAD_REQUEST.into_response()
    })?;

    let caller = peer.ip().to_string();
    let address = request.address_or(&caller);
    tracing::debug!(
        response_type = %request.response_type,
        address,
        "access token requested"
    );

    match state.issuer.issue_token(&request.client_id, address).await {
        Ok(record) => Ok(Json(record)),
        Err(IssuanceError::InvalidRequest(reason)) => {
            tracing::debug!(%reason, "rejected access token request");
            Err(StatusCode::BAD_REQUEST.into_response())
        }
        Err(IssuanceError::UnknownClient) => Err(StatusCode::UNAUTHORIZED.into_response()),
        Err(err) => Err(HttpError::RequestProcessingFailed(err.to_string()).into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_support::{create_failing_app_state, create_test_app_state};

    fn peer() -> ConnectInfo<SocketAddr> {
        ConnectInfo("1.2.3.4:5000".parse().unwrap())
    }

    fn body(client_id: &str) -> Bytes {
        Bytes::from(
            serde_json::to_vec(&AccessTokenRequest {
                response_type: "code".to_string(),
                client_id: client_id.to_string(),
                state: "state".to_string(),
                address: None,
            })
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_issue_for_registered_caller() {
        let state = create_test_app_state();
        let client_id = state.registrar.register_client("1.2.3.4").await.unwrap();

        let Json(record) = handle_get_access_token(State(state), peer(), body(&client_id))
            .await
            .unwrap();
        assert_eq!(record.client_id, client_id);
        assert_eq!(record.address, "1.2.3.4");
    }

    #[tokio::test]
    async fn test_explicit_address_overrides_caller() {
        let state = create_test_app_state();
        let client_id = state.registrar.register_client("9.8.7.6").await.unwrap();
        let request = AccessTokenRequest {
            client_id: client_id.clone(),
            address: Some("9.8.7.6".to_string()),
            ..Default::default()
        };

        let Json(record) = handle_get_access_token(
            State(state),
            peer(),
            Bytes::from(serde_json::to_vec(&request).unwrap()),
        )
        .await
        .unwrap();
        assert_eq!(record.address, "9.8.7.6");
    }

    #[tokio::test]
    async fn test_status_codes() {
        let state = create_test_app_state();

        let response = handle_get_access_token(State(state.clone()), peer(), Bytes::from("{"))
            .await
            .unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = handle_get_access_token(State(state.clone()), peer(), body(""))
            .await
            .unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = handle_get_access_token(State(state), peer(), body("unknown-id"))
            .await
            .unwrap_err();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response =
            handle_get_access_token(State(create_failing_app_state()), peer(), body("client"))
                .await
                .unwrap_err();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
