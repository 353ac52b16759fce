//! Upload admission control
//!
//! Counts uploads and their volume inside a rolling window. Crossing either
//! threshold pauses the relay for a fixed duration; while paused both upload
//! and retrieve requests are refused. Counters are cleared on their own
//! schedule, independently of the pause.

use crate::scheduler::{Scheduler, TaskHandle};
use blinkdrop_core::constants::BYTES_PER_MB;
use blinkdrop_core::AdmissionConfig;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct AdmissionState {
    upload_count: u64,
    upload_size_mb: f64,
    paused: bool,
}

/// Point-in-time copy of the admission state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdmissionSnapshot {
    pub upload_count: u64,
    pub upload_size_mb: f64,
    pub paused: bool,
}

#[derive(Clone)]
pub struct AdmissionController {
    config: AdmissionConfig,
    state: Arc<Mutex<AdmissionState>>,
    scheduler: Scheduler,
}

fn lock(state: &Mutex<AdmissionState>) -> MutexGuard<'_, AdmissionState> {
    // The state is plain counters; a panic mid-update cannot leave it unusable.
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl AdmissionController {
    pub fn new(config: AdmissionConfig, scheduler: Scheduler) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(AdmissionState::default())),
            scheduler,
        }
    }

    /// Account for one accepted upload of `size_bytes`.
    pub fn record_upload(&self, size_bytes: u64) {
        let mut state = lock(&self.state);
        state.upload_count += 1;
        state.upload_size_mb += size_bytes as f64 / BYTES_PER_MB;
        debug!(
            upload_count = state.upload_count,
            upload_size_mb = state.upload_size_mb,
            "Upload recorded"
        );
    }

    /// Pause the relay if a threshold has been crossed. Returns whether the
    /// relay is paused afterwards.
    ///
    /// The resume timer is only scheduled on the transition into the paused
    /// state, so repeated calls while paused never stack timers.
    pub fn evaluate(&self) -> bool {
        let tripped = {
            let mut state = lock(&self.state);
            if state.paused {
                return true;
            }
            if state.upload_count >= self.config.upload_count_threshold
                || state.upload_size_mb >= self.config.upload_size_threshold_mb
            {
                state.paused = true;
                warn!(
                    upload_count = state.upload_count,
                    upload_size_mb = state.upload_size_mb,
                    pause_secs = self.config.pause_duration.as_secs(),
                    "Upload threshold reached, pausing service"
                );
                true
            } else {
                false
            }
        };

        if tripped {
            let state = self.state.clone();
            self.scheduler
                .run_once_after("admission-resume", self.config.pause_duration, move || async move {
                    lock(&state).paused = false;
                    info!("Pause expired, service resumed");
                });
        }

        tripped
    }

    pub fn is_paused(&self) -> bool {
        lock(&self.state).paused
    }

    /// Zero both counters. The pause flag is left alone.
    pub fn reset_window(&self) {
        let mut state = lock(&self.state);
        info!(
            upload_count = state.upload_count,
            upload_size_mb = state.upload_size_mb,
            "Resetting upload counters"
        );
        state.upload_count = 0;
        state.upload_size_mb = 0.0;
    }

    pub fn snapshot(&self) -> AdmissionSnapshot {
        let state = lock(&self.state);
        AdmissionSnapshot {
            upload_count: state.upload_count,
            upload_size_mb: state.upload_size_mb,
            paused: state.paused,
        }
    }

    /// Schedule the periodic counter reset.
    pub fn start_window_reset(&self) -> TaskHandle {
        let controller = self.clone();
        self.scheduler.run_every(
            "admission-window-reset",
            self.config.counter_reset_interval,
            move || {
                let controller = controller.clone();
                async move { controller.reset_window() }
            },
        )
    }
}
