//! Access codes: short random identifiers that double as storage keys and as the
//! only credential needed to retrieve an object.

use crate::constants::ACCESS_CODE_LENGTH;
use crate::error::AppError;
use rand::RngCore;
use std::fmt;

/// A short lowercase hexadecimal access code.
///
/// Codes are not checked for uniqueness against live objects. Two uploads that
/// draw the same code inside the retention window share a key and the later one
/// overwrites the earlier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AccessCode(String);

impl AccessCode {
    /// Draw a fresh code from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; ACCESS_CODE_LENGTH.div_ceil(2)];
        rand::rng().fill_bytes(&mut bytes);
        let mut code = hex::encode(bytes);
        code.truncate(ACCESS_CODE_LENGTH);
        AccessCode(code)
    }

    /// Accept a code supplied by a client.
    ///
    /// Only emptiness is rejected; a malformed code is simply a key that does not
    /// exist in the store.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::BadRequest("Access code is required".to_string()));
        }
        Ok(AccessCode(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
