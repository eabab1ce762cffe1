//! Credential lifecycle: client registration, token issuance, and token validation.
//!
//! Each service takes its stores and generator as injected trait objects so the
//! same logic runs against the in-memory, SQLite, and PostgreSQL backends.

pub mod generator;
pub mod issuer;
pub mod registrar;
pub mod types;
pub mod validator;

pub use generator::{RandomTokenGenerator, TokenGenerator};
pub use issuer::TokenIssuer;
pub use registrar::ClientRegistrar;
pub use types::{AccessTokenRequest, ClientIdentity, TokenRecord};
pub use validator::TokenValidator;
