//! Blinkdrop API Library
//!
//! This crate provides the HTTP handlers, application state and setup for the
//! relay binary.

pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
mod utils;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
