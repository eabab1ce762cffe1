//! Bearer token authentication for protected endpoints.
//!
//! A request is authorised when its bearer token, `X-Client-Id` header, and
//! peer IP together match an issued token record.

use axum::RequestPartsExt;
use axum::extract::{ConnectInfo, FromRef, FromRequestParts};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use http::request::Parts;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::auth::TokenValidator;
use crate::auth::types::{ClientIdentity, TokenRecord};

/// Header carrying the caller's client id alongside the bearer token
pub const CLIENT_ID_HEADER: &str = "x-client-id";

/// Authenticated client extractor for protected endpoints
///
/// # Example
///
/// ```ignore
/// use axum::{routing::get, Json, Router};
/// use authservice::http::middleware_auth::AuthorisedClient;
///
/// async fn protected_handler(AuthorisedClient(identity): AuthorisedClient) -> String {
///     format!("hello {}", identity.address)
/// }
///
/// let app = Router::new().route("/api/protected", get(protected_handler));
/// ```
#[derive(Clone, Debug)]
pub struct AuthorisedClient(pub ClientIdentity);

/// Create an error response in the `{error, error_description}` shape
fn create_auth_error_response(error: &str, error_description: &str) -> Response {
    let body = json!({
        "error": error,
        "error_description": error_description
    });

    (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
}

impl<S> FromRequestParts<S> for AuthorisedClient
where
    Arc<TokenValidator>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let validator = Arc::<TokenValidator>::from_ref(state);

        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                create_auth_error_response("invalid_request", "Missing Authorization header")
            })?;

        let access_token = match auth_header.split_once(' ') {
            Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => {
                token.trim().to_string()
            }
            Some(_) => {
                return Err(create_auth_error_response(
                    "invalid_request",
                    "Unsupported token type",
                ));
            }
            None => {
                return Err(create_auth_error_response(
                    "invalid_request",
                    "Invalid Authorization header format",
                ));
            }
        };

        let client_id = parts
            .headers
            .get(CLIENT_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                create_auth_error_response("invalid_request", "Missing X-Client-Id header")
            })?;

        let ConnectInfo(peer) = parts
            .extract::<ConnectInfo<SocketAddr>>()
            .await
            .map_err(|err| {
                tracing::error!(?err, "peer address unavailable");
                create_auth_error_response("invalid_request", "Caller address unavailable")
            })?;

        // Only the bound fields take part in validation.
        let record = TokenRecord::new(
            client_id,
            peer.ip().to_string(),
            access_token,
            String::new(),
        );

        if !validator.validate(&record).await {
            return Err(create_auth_error_response(
                "invalid_token",
                "Token is not valid for this client and address",
            ));
        }

        Ok(AuthorisedClient(ClientIdentity::new(
            record.client_id,
            record.address,
        )))
    }
}
