//! Error types for vidstream core

use thiserror::Error;

/// Result type alias for playback operations
pub type Result<T> = std::result::Result<T, Error>;

/// Playback error types
#[derive(Error, Debug)]
pub enum Error {
    // Source errors
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    // Engine errors
    #[error("Media engine failed to {operation}: {message}")]
    Engine {
        operation: &'static str,
        message: String,
    },

    #[error("Prepare timed out after {timeout_ms}ms")]
    PrepareTimeout { timeout_ms: u64 },

    // Lifecycle errors
    #[error("Controller has been released")]
    Disposed,

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an engine error for the given operation
    pub fn engine(operation: &'static str, message: impl Into<String>) -> Self {
        Error::Engine {
            operation,
            message: message.into(),
        }
    }

    /// Returns true if the caller may retry by playing again
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Engine { .. } | Error::PrepareTimeout { .. })
    }

    /// Returns a stable error code for logs and UI
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidSource(_) => "INVALID_SOURCE",
            Error::Engine { .. } => "ENGINE",
            Error::PrepareTimeout { .. } => "PREPARE_TIMEOUT",
            Error::Disposed => "DISPOSED",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Io(_) => "IO",
        }
    }
}
