//! Unified error type for all observers.
//!
//! Observers that only build strings cannot fail; errors come from writing
//! the report out or from serialization.

use thiserror::Error;

/// Unified error type for all observer operations.
#[derive(Debug, Error)]
pub enum ObserverError {
    /// Error writing the rendered report.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the JSON observer.
    #[cfg(feature = "json")]
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for observer operations.
pub type Result<T> = std::result::Result<T, ObserverError>;
