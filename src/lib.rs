//! authservice library crate.
//!
//! Issues opaque bearer credentials bound to a registered client id and the
//! network address it registered from, and validates them on request.

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod storage;
