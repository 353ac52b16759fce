//! Blob store abstraction trait
//!
//! This module defines the `BlobStore` trait every storage backend implements.
//! The relay only needs four operations from its store: put, get, list and a
//! bulk delete. Keys are access codes; metadata travels next to the bytes.

use crate::StorageBackend;
use async_trait::async_trait;
use blinkdrop_core::{ObjectMetadata, ObjectSummary, StoredObject};
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("List failed: {0}")]
    ListFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A single object write.
#[derive(Debug, Clone)]
pub struct PutObject {
    pub key: String,
    pub data: Bytes,
    pub metadata: ObjectMetadata,
    pub content_type: String,
    /// Ask the provider to encrypt the object at rest.
    pub server_side_encryption: bool,
}

/// Blob store abstraction trait
///
/// Implementations must be safe to share between concurrent request handlers
/// and background sweeps; the relay holds a single `Arc<dyn BlobStore>`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store an object, replacing any object already under the same key.
    async fn put(&self, object: PutObject) -> StorageResult<()>;

    /// Fetch an object and its metadata. Missing keys yield `StorageError::NotFound`.
    async fn get(&self, key: &str) -> StorageResult<StoredObject>;

    /// List every object currently in the store.
    async fn list(&self) -> StorageResult<Vec<ObjectSummary>>;

    /// Delete the given keys in one best-effort batch and return how many were removed.
    async fn delete_many(&self, keys: &[String]) -> StorageResult<usize>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
