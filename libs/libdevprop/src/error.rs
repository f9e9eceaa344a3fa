//! Error types for property access

use std::process::ExitStatus;
use thiserror::Error;

/// Property access errors
#[derive(Debug, Error)]
pub enum DevPropError {
    /// Key the property service cannot hold
    #[error("Invalid property key: {0:?}")]
    InvalidKey(String),

    /// Property tool could not be started
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Property tool ran but failed
    #[error("{program} exited with {status}")]
    CommandFailed {
        program: &'static str,
        status: ExitStatus,
    },

    /// Value bytes are not UTF-8
    #[error("Property {0} is not valid UTF-8")]
    InvalidUtf8(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for property operations
pub type Result<T> = std::result::Result<T, DevPropError>;
