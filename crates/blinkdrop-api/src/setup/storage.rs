//! Storage setup and initialization

use anyhow::Result;
use blinkdrop_core::Config;
use blinkdrop_storage::{create_storage, BlobStore};
use std::sync::Arc;

pub fn setup_storage(config: &Config) -> Result<Arc<dyn BlobStore>> {
    tracing::info!("Initializing blob store...");
    let storage = create_storage(config)?;
    tracing::info!(
        backend = %storage.backend_type(),
        bucket = ?config.storage().bucket_name,
        "Blob store initialized successfully"
    );
    Ok(storage)
}
