//! Command execution error types.

use std::time::Duration;

/// Errors raised while running an external command.
#[derive(thiserror::Error, Debug)]
pub enum ExecError {
    /// The shell or binary was not found.
    #[error("Command shell not found")]
    NotFound,

    /// Permission denied when spawning.
    #[error("Permission denied")]
    PermissionDenied,

    /// The command did not finish within the configured bound.
    #[error("Command timed out after {}s: {command}", duration.as_secs())]
    Timeout { command: String, duration: Duration },

    /// The caller cancelled the command; the child was terminated.
    #[error("Command cancelled: {command}")]
    Cancelled { command: String },

    /// Other I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExecError {
    /// Create an `ExecError` from an I/O error, classifying common cases.
    pub(crate) fn from_io(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound,
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Io(err),
        }
    }
}
