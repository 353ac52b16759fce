//! Constants shared across crates.

/// Number of characters in a generated access code.
pub const ACCESS_CODE_LENGTH: usize = 4;

/// Extension stored when the uploaded filename has none.
pub const DEFAULT_EXTENSION: &str = "bin";

/// File type stored when the client sends no `type` field.
pub const DEFAULT_FILE_TYPE: &str = "unknown";

/// Content type used for every stored object and every retrieve response.
pub const CIPHERTEXT_CONTENT_TYPE: &str = "application/octet-stream";

/// Metadata keys written next to each object.
pub mod metadata_keys {
    pub const FILE_TYPE: &str = "filetype";
    pub const IV: &str = "iv";
    pub const SALT: &str = "salt";
    pub const EXTENSION: &str = "extension";
}

/// Response headers surfacing the decryption parameters on retrieve.
pub mod headers {
    pub const IV: &str = "X-IV";
    pub const SALT: &str = "X-SALT";
    pub const EXTENSION: &str = "X-EXTENSION";
}

pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
