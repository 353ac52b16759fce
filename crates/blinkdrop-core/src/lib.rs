//! Blinkdrop Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! every Blinkdrop component: the access code type, stored-object metadata, the
//! `AppError` taxonomy and the environment-driven `Config`.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{AdmissionConfig, BaseConfig, Config, RelayConfig, RetentionConfig, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{AccessCode, ObjectMetadata, ObjectSummary, StoredObject};
pub use storage_types::StorageBackend;
