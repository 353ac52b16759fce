use crate::object::ObjectBlobStore;
use crate::StorageBackend;
use object_store::memory::InMemory;
use object_store::ObjectStore;
use std::sync::Arc;

impl ObjectBlobStore {
    /// Create a process-local store. Contents vanish with the process and
    /// encryption at rest is a no-op.
    pub fn in_memory() -> Self {
        let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        ObjectBlobStore::from_parts(
            store.clone(),
            store,
            "memory".to_string(),
            StorageBackend::Memory,
        )
    }
}
