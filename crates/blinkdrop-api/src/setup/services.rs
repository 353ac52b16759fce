//! Service initialization and background tasks

use crate::state::AppState;
use blinkdrop_core::Config;
use blinkdrop_infra::{AdmissionController, RetentionSweeper, Scheduler};
use blinkdrop_storage::BlobStore;
use std::sync::Arc;

/// Build the application state. No timers are started here.
pub fn initialize_services(config: &Config, storage: Arc<dyn BlobStore>) -> Arc<AppState> {
    let scheduler = Scheduler::new();
    let admission = AdmissionController::new(config.admission().clone(), scheduler.clone());
    let retention = RetentionSweeper::new(storage.clone(), config.retention().retention_window);

    tracing::info!(
        upload_count_threshold = config.admission().upload_count_threshold,
        upload_size_threshold_mb = config.admission().upload_size_threshold_mb,
        pause_secs = config.admission().pause_duration.as_secs(),
        retention_secs = config.retention().retention_window.as_secs(),
        "Admission control and retention configured"
    );

    Arc::new(AppState {
        storage,
        admission,
        retention,
        scheduler,
    })
}

/// Start the periodic counter reset and retention sweep.
pub fn start_background_tasks(config: &Config, state: &AppState) {
    state.admission.start_window_reset();
    state
        .retention
        .start(&state.scheduler, config.retention().sweep_interval);
}
