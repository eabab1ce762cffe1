//! Axum HTTP server handlers and middleware for the credential endpoints.

pub mod context;
mod handler_access_token;
mod handler_authorise;
mod handler_client_id;
mod handler_whoami;
pub mod middleware_auth;
pub mod server;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::AppState;
pub use server::build_router;
