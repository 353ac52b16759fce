//! Blinkdrop Storage Library
//!
//! This crate provides the `BlobStore` abstraction the relay writes ciphertext
//! to, plus an implementation over the `object_store` crate that covers
//! S3-compatible providers and an in-process store.
//!
//! # Key format
//!
//! Keys are access codes and live at the bucket root. Keys must not be empty
//! and must not contain `/` or `..`.

pub mod factory;
#[cfg(feature = "storage-memory")]
mod memory;
#[cfg(any(feature = "storage-s3", feature = "storage-memory"))]
pub mod object;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use blinkdrop_core::StorageBackend;
pub use factory::create_storage;
#[cfg(any(feature = "storage-s3", feature = "storage-memory"))]
pub use object::ObjectBlobStore;
#[cfg(feature = "storage-s3")]
pub use s3::S3Settings;
pub use traits::{BlobStore, PutObject, StorageError, StorageResult};
