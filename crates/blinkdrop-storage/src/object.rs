//! `BlobStore` implementation on top of the `object_store` crate.
//!
//! The same adapter serves every backend: S3-compatible providers and the
//! in-process store differ only in how the underlying `ObjectStore` is built
//! (see `s3.rs` and `memory.rs`).

use crate::traits::{BlobStore, PutObject, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use blinkdrop_core::{ObjectMetadata, ObjectSummary, StoredObject};
use futures::{StreamExt, TryStreamExt};
use object_store::path::Path;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

/// Blob store backed by any `object_store::ObjectStore`.
#[derive(Clone)]
pub struct ObjectBlobStore {
    /// Client used for ordinary writes and for all reads, lists and deletes.
    store: Arc<dyn ObjectStore>,
    /// Client configured to request server-side encryption on writes.
    encrypted_store: Arc<dyn ObjectStore>,
    bucket: String,
    backend: StorageBackend,
}

impl ObjectBlobStore {
    pub(crate) fn from_parts(
        store: Arc<dyn ObjectStore>,
        encrypted_store: Arc<dyn ObjectStore>,
        bucket: String,
        backend: StorageBackend,
    ) -> Self {
        Self {
            store,
            encrypted_store,
            bucket,
            backend,
        }
    }

    fn location(key: &str) -> StorageResult<Path> {
        if key.is_empty() || key.contains("..") || key.contains('/') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(Path::from(key))
    }
}

fn metadata_to_attributes(metadata: &ObjectMetadata, content_type: &str) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert(
        Attribute::ContentType,
        AttributeValue::from(content_type.to_string()),
    );
    for (key, value) in metadata.to_map() {
        attributes.insert(
            Attribute::Metadata(Cow::Owned(key)),
            AttributeValue::from(value),
        );
    }
    attributes
}

fn attributes_to_metadata(attributes: &Attributes) -> ObjectMetadata {
    let map: HashMap<String, String> = attributes
        .iter()
        .filter_map(|(attribute, value)| match attribute {
            Attribute::Metadata(key) => Some((key.to_lowercase(), value.as_ref().to_string())),
            _ => None,
        })
        .collect();
    ObjectMetadata::from_map(&map)
}

#[async_trait]
impl BlobStore for ObjectBlobStore {
    async fn put(&self, object: PutObject) -> StorageResult<()> {
        let location = Self::location(&object.key)?;
        let size = object.data.len() as u64;
        let start = std::time::Instant::now();

        let opts = PutOptions {
            attributes: metadata_to_attributes(&object.metadata, &object.content_type),
            ..Default::default()
        };

        let store = if object.server_side_encryption {
            &self.encrypted_store
        } else {
            &self.store
        };

        store
            .put_opts(&location, PutPayload::from(object.data), opts)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %object.key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %object.key,
            size_bytes = size,
            encrypted_at_rest = object.server_side_encryption,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object upload successful"
        );

        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<StoredObject> {
        let location = Self::location(key)?;
        let start = std::time::Instant::now();

        let result = self.store.get(&location).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object download failed"
                );
                StorageError::DownloadFailed(other.to_string())
            }
        })?;

        let metadata = attributes_to_metadata(&result.attributes);
        let last_modified = result.meta.last_modified;

        // Buffer the whole body so a concurrent delete surfaces as an error
        // instead of a truncated response.
        let data = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = data.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object download successful"
        );

        Ok(StoredObject {
            key: key.to_string(),
            data,
            metadata,
            last_modified,
        })
    }

    async fn list(&self) -> StorageResult<Vec<ObjectSummary>> {
        let objects: Vec<_> = self
            .store
            .list(None)
            .try_collect()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, bucket = %self.bucket, "Object listing failed");
                StorageError::ListFailed(e.to_string())
            })?;

        Ok(objects
            .into_iter()
            .map(|meta| ObjectSummary {
                key: meta.location.to_string(),
                last_modified: meta.last_modified,
                size: meta.size,
            })
            .collect())
    }

    async fn delete_many(&self, keys: &[String]) -> StorageResult<usize> {
        if keys.is_empty() {
            return Ok(0);
        }

        let locations: Vec<object_store::Result<Path>> = keys
            .iter()
            .map(|key| Ok(Path::from(key.as_str())))
            .collect();

        let results: Vec<_> = self
            .store
            .delete_stream(futures::stream::iter(locations).boxed())
            .collect()
            .await;

        let mut deleted = 0usize;
        let mut last_error = None;
        for result in results {
            match result {
                Ok(_) => deleted += 1,
                // Already gone counts as done.
                Err(object_store::Error::NotFound { .. }) => deleted += 1,
                Err(e) => {
                    tracing::error!(error = %e, bucket = %self.bucket, "Object delete failed");
                    last_error = Some(e.to_string());
                }
            }
        }

        match last_error {
            Some(error) if deleted == 0 => Err(StorageError::DeleteFailed(error)),
            _ => Ok(deleted),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        self.backend
    }
}
