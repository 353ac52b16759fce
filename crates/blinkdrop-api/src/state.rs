//! Application state shared by every handler.

use blinkdrop_infra::{AdmissionController, RetentionSweeper, Scheduler};
use blinkdrop_storage::BlobStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Where ciphertext lives.
    pub storage: Arc<dyn BlobStore>,
    /// Upload counters and the pause flag.
    pub admission: AdmissionController,
    pub retention: RetentionSweeper,
    /// Owns the background timers; stopped after the server drains.
    pub scheduler: Scheduler,
}
