use crate::object::ObjectBlobStore;
use crate::traits::{StorageError, StorageResult};
use crate::StorageBackend;
use object_store::aws::{AmazonS3Builder, AmazonS3ConfigKey};
use std::sync::Arc;

const SSE_CONFIG_KEY: &str = "aws_server_side_encryption";
const SSE_ALGORITHM: &str = "AES256";

/// Connection settings for an S3-compatible provider.
#[derive(Clone, Debug)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers (Cloudflare R2, MinIO, ...).
    pub endpoint_url: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl ObjectBlobStore {
    /// Create a store talking to an S3-compatible bucket.
    ///
    /// Path-style addressing is used so that R2 and MinIO endpoints work
    /// unchanged. Two clients are built from the same settings; the second one
    /// requests AES256 server-side encryption on every write.
    pub fn s3(settings: S3Settings) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(settings.region.clone())
            .with_bucket_name(settings.bucket.clone())
            .with_virtual_hosted_style_request(false);

        if let Some(ref endpoint) = settings.endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }
        if let Some(ref key_id) = settings.access_key_id {
            builder = builder.with_access_key_id(key_id.clone());
        }
        if let Some(ref secret) = settings.secret_access_key {
            builder = builder.with_secret_access_key(secret.clone());
        }

        let sse_key = SSE_CONFIG_KEY
            .parse::<AmazonS3ConfigKey>()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        let encrypted = builder
            .clone()
            .with_config(sse_key, SSE_ALGORITHM)
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        let plain = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        tracing::info!(
            bucket = %settings.bucket,
            region = %settings.region,
            endpoint = ?settings.endpoint_url,
            "S3 blob store configured"
        );

        Ok(ObjectBlobStore::from_parts(
            Arc::new(plain),
            Arc::new(encrypted),
            settings.bucket,
            StorageBackend::S3,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::BlobStore;

    fn settings() -> S3Settings {
        S3Settings {
            bucket: "relay".to_string(),
            region: "auto".to_string(),
            endpoint_url: Some("http://127.0.0.1:9000".to_string()),
            access_key_id: Some("key".to_string()),
            secret_access_key: Some("secret".to_string()),
        }
    }

    #[test]
    fn builds_s3_store_with_encryption_client() {
        let store = ObjectBlobStore::s3(settings()).unwrap();
        assert_eq!(store.backend_type(), StorageBackend::S3);
    }

    #[test]
    fn encryption_key_name_is_recognised() {
        assert!(SSE_CONFIG_KEY.parse::<AmazonS3ConfigKey>().is_ok());
    }
}
