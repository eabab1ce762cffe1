//! Unpredictable string generation for client identifiers and tokens.

use base64::prelude::*;
use rand::RngCore;
use rand::rngs::OsRng;

use crate::errors::GenerateError;

/// Produces cryptographically unpredictable strings of a requested length
pub trait TokenGenerator: Send + Sync {
    /// Generate a string of exactly `length` characters
    fn generate(&self, length: usize) -> Result<String, GenerateError>;
}

/// URL-safe base64 strings drawn from the operating system RNG
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomTokenGenerator;

impl RandomTokenGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self, length: usize) -> Result<String, GenerateError> {
        // Each 3 bytes encode to 4 characters.
        let mut bytes = vec![0u8; (length * 3).div_ceil(4)];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| GenerateError::RandomSourceFailed(e.to_string()))?;

        let mut value = BASE64_URL_SAFE_NO_PAD.encode(bytes);
        value.truncate(length);
        Ok(value)
    }
}
