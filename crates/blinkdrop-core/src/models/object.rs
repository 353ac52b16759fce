use crate::constants::{metadata_keys, DEFAULT_EXTENSION, DEFAULT_FILE_TYPE};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Non-secret parameters stored next to each ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ObjectMetadata {
    pub file_type: String,
    pub iv: String,
    pub salt: String,
    pub extension: String,
}

impl ObjectMetadata {
    /// Flatten into the key/value map written to the blob store.
    pub fn to_map(&self) -> HashMap<String, String> {
        HashMap::from([
            (metadata_keys::FILE_TYPE.to_string(), self.file_type.clone()),
            (metadata_keys::IV.to_string(), self.iv.clone()),
            (metadata_keys::SALT.to_string(), self.salt.clone()),
            (metadata_keys::EXTENSION.to_string(), self.extension.clone()),
        ])
    }

    /// Rebuild from a store metadata map.
    ///
    /// Some S3-compatible providers return `+` in user metadata as a space, so
    /// base64 values are repaired here. Missing keys fall back to empty strings
    /// (iv, salt) or the upload defaults.
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).cloned();
        Self {
            file_type: get(metadata_keys::FILE_TYPE)
                .unwrap_or_else(|| DEFAULT_FILE_TYPE.to_string()),
            iv: restore_base64(&get(metadata_keys::IV).unwrap_or_default()),
            salt: restore_base64(&get(metadata_keys::SALT).unwrap_or_default()),
            extension: get(metadata_keys::EXTENSION)
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
        }
    }
}

/// Undo a transport-level `+` → space substitution.
pub fn restore_base64(value: &str) -> String {
    value.replace(' ', "+")
}

/// An object as read back from the store.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub data: Bytes,
    pub metadata: ObjectMetadata,
    pub last_modified: DateTime<Utc>,
}

/// One entry of a store listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub last_modified: DateTime<Utc>,
    pub size: u64,
}
