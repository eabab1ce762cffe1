//! Handles POST /authorise - Answers whether a presented token record is valid

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::context::AppState;
use crate::auth::types::TokenRecord;

/// Handle authorisation checks
/// POST /authorise - Returns "true" or "false" as plain text
pub async fn handle_authorise(State(state): State<AppState>, body: Bytes) -> Response {
    if body.is_empty() {
        return (StatusCode::BAD_REQUEST, "Please send a request body").into_response();
    }

    let record: TokenRecord = match serde_json::from_slice(&body) {
        Ok(record) => record,
        Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    };

    let valid = state.validator.validate(&record).await;
    if !valid {
        tracing::debug!(address = %record.address, "presented token rejected");
    }

    valid.to_string().into_response()
}
