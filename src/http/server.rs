//! Main router configuration assembling the credential endpoints.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::{
    context::AppState, handler_access_token::handle_get_access_token,
    handler_authorise::handle_authorise, handler_client_id::handle_get_client_id,
    handler_whoami::handle_whoami,
};

/// Build the application router
///
/// Handlers read the caller's address from `ConnectInfo<SocketAddr>`, so the
/// router must be served with `into_make_service_with_connect_info`.
pub fn build_router(ctx: AppState) -> Router {
    let protected_api_routes = Router::new().route("/whoami", get(handle_whoami));

    Router::new()
        .route("/getclientid", get(handle_get_client_id))
        .route(
            "/getaccesstoken",
            get(handle_get_access_token).post(handle_get_access_token),
        )
        .route("/authorise", post(handle_authorise))
        .nest("/api", protected_api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
