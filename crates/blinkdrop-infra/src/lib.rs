//! Blinkdrop Infrastructure Library
//!
//! Background machinery shared by the relay:
//! - Task scheduler (recurring and one-shot timers)
//! - Upload admission control
//! - Retention sweep
//! - Telemetry initialization

#[cfg(feature = "scheduler")]
pub mod scheduler;

#[cfg(feature = "admission")]
pub mod admission;

#[cfg(feature = "retention")]
pub mod retention;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

// Re-export commonly used types
#[cfg(feature = "scheduler")]
pub use scheduler::{Scheduler, TaskHandle};

#[cfg(feature = "admission")]
pub use admission::{AdmissionController, AdmissionSnapshot};

#[cfg(feature = "retention")]
pub use retention::{RetentionSweeper, SweepReport};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry};
