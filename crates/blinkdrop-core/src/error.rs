//! Error types module
//!
//! All request-path failures are unified under `AppError`. Each variant
//! self-describes how it is presented over HTTP through `ErrorMetadata`, so the
//! API crate can render responses without knowing about individual failures.
//! Background tasks (sweeps, resets) never produce `AppError`; they log and move on.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like missing fields
    Debug,
    /// Warning level - for load shedding
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message. Never carries backend detail.
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service temporarily unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

}

impl AppError {
    /// The outcome handlers return while the admission controller holds the pause.
    pub fn paused() -> Self {
        AppError::ServiceUnavailable(
            "Service temporarily unavailable due to high traffic.".to_string(),
        )
    }

    /// Get the error type name for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BadRequest",
            AppError::ServiceUnavailable(_) => "ServiceUnavailable",
            AppError::Storage(_) => "Storage",
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (u16, &'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        AppError::BadRequest(_) => (
            400,
            "BAD_REQUEST",
            false,
            Some("Check request format and parameters"),
            LogLevel::Debug,
        ),
        AppError::ServiceUnavailable(_) => (
            503,
            "SERVICE_UNAVAILABLE",
            true,
            Some("Retry later"),
            LogLevel::Warn,
        ),
        AppError::Storage(_) => (500, "STORAGE_ERROR", true, None, LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            AppError::BadRequest(ref msg) => msg.clone(),
            AppError::ServiceUnavailable(ref msg) => msg.clone(),
            AppError::Storage(_) => "Server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_bad_request() {
        let err = AppError::BadRequest("Access code is required".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "BAD_REQUEST");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Access code is required");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_paused() {
        let err = AppError::paused();
        assert_eq!(err.http_status_code(), 503);
        assert_eq!(err.error_code(), "SERVICE_UNAVAILABLE");
        assert!(err.is_recoverable());
        assert!(err.client_message().contains("high traffic"));
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_storage_error_hides_backend_detail() {
        let err = AppError::Storage("NoSuchKey: bucket relay, key ab12".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "Server error");
        assert!(!err.client_message().contains("bucket"));
    }
}
