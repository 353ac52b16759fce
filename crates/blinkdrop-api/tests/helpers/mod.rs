#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use blinkdrop_api::setup::{routes, services};
use blinkdrop_api::AppState;
use blinkdrop_core::{Config, ObjectSummary, StoredObject};
use blinkdrop_storage::{
    BlobStore, ObjectBlobStore, PutObject, StorageBackend, StorageError, StorageResult,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Test application backed by the in-memory store
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
}

impl TestApp {
    /// Get the HTTP test client
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Setup a test application with default thresholds
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

/// Setup a test application with extra environment overrides
pub async fn setup_test_app_with(vars: &[(&str, &str)]) -> TestApp {
    build_test_app(vars, Arc::new(ObjectBlobStore::in_memory()))
}

/// Setup a test application on top of a caller-provided store
pub async fn setup_test_app_with_store(storage: Arc<dyn BlobStore>) -> TestApp {
    build_test_app(&[], storage)
}

fn build_test_app(vars: &[(&str, &str)], storage: Arc<dyn BlobStore>) -> TestApp {
    let mut env: HashMap<String, String> = HashMap::from([(
        "STORAGE_BACKEND".to_string(),
        "memory".to_string(),
    )]);
    for (key, value) in vars {
        env.insert(key.to_string(), value.to_string());
    }

    let config = Config::from_lookup(|key| env.get(key).cloned()).expect("Invalid test config");
    let state = services::initialize_services(&config, storage);
    let app = routes::setup_routes(&config, state.clone()).expect("Failed to build routes");

    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, state }
}

/// Store whose writes always fail, for exercising the upload error path
pub struct UnreachableStore;

#[async_trait]
impl BlobStore for UnreachableStore {
    async fn put(&self, _object: PutObject) -> StorageResult<()> {
        Err(StorageError::UploadFailed(
            "bucket relay unreachable".to_string(),
        ))
    }

    async fn get(&self, key: &str) -> StorageResult<StoredObject> {
        Err(StorageError::NotFound(key.to_string()))
    }

    async fn list(&self) -> StorageResult<Vec<ObjectSummary>> {
        Ok(Vec::new())
    }

    async fn delete_many(&self, _keys: &[String]) -> StorageResult<usize> {
        Ok(0)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

/// A complete upload form
pub fn upload_form(file_name: &str, data: &[u8]) -> MultipartForm {
    MultipartForm::new()
        .add_part(
            "file",
            Part::bytes(data.to_vec())
                .file_name(file_name)
                .mime_type("application/octet-stream"),
        )
        .add_text("secretWord", "correct horse")
        .add_text("type", "text/plain")
        .add_text("iv", "q+8/AAECAwQFBgcI")
        .add_text("salt", "c2FsdHNhbHQ+")
}
