#[cfg(feature = "storage-s3")]
use crate::s3::S3Settings;
#[cfg(any(feature = "storage-s3", feature = "storage-memory"))]
use crate::ObjectBlobStore;
use crate::{BlobStore, StorageBackend, StorageError, StorageResult};
use blinkdrop_core::Config;
use std::sync::Arc;

/// Create a blob store based on configuration
pub fn create_storage(config: &Config) -> StorageResult<Arc<dyn BlobStore>> {
    let storage = config.storage();

    match storage.backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = storage
                .bucket_name
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET_NAME not configured".to_string()))?;

            let store = ObjectBlobStore::s3(S3Settings {
                bucket,
                region: storage.region.clone(),
                endpoint_url: storage.endpoint.clone(),
                access_key_id: storage.access_key_id.clone(),
                secret_access_key: storage.secret_access_key.clone(),
            })?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-memory")]
        StorageBackend::Memory => Ok(Arc::new(ObjectBlobStore::in_memory())),

        #[cfg(not(feature = "storage-memory"))]
        StorageBackend::Memory => Err(StorageError::ConfigError(
            "Memory storage backend not available (storage-memory feature not enabled)".to_string(),
        )),
    }
}
