//! Crate-level error type.

use std::time::Duration;

use crate::config::ConfigError;
use crate::exec::ExecError;
use crate::parse::ParseError;

/// Stable message of [`P4Error::Encoding`], for callers that match on text.
pub const ENCODING_ERROR_MESSAGE: &str = "untranslatable parameter";

/// Errors returned by client operations.
#[derive(thiserror::Error, Debug)]
pub enum P4Error {
    /// Login or trust establishment failed.
    #[error("Authentication failed (exit code {exit_code}): {stderr}")]
    Authentication { exit_code: i32, stderr: String },

    /// Login succeeded but no ticket line for the user was listed.
    #[error("No ticket found for {user} on {port}")]
    TicketNotFound { user: String, port: String },

    /// A query exited with an error.
    #[error("Command failed (exit code {exit_code}): {command}: {stderr}")]
    Command {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// A command exceeded its time bound.
    #[error("Command timed out after {}s: {command}", duration.as_secs())]
    Timeout { command: String, duration: Duration },

    /// The describe target does not exist or its header is unreadable.
    #[error("Invalid revision: {0}")]
    InvalidRevision(String),

    /// The server could not translate a parameter to its character set.
    #[error("untranslatable parameter: {stderr}")]
    Encoding { stderr: String },

    /// The server fingerprint is not trusted and the query produced no output.
    #[error("Untrusted server: {hint}")]
    Untrusted { hint: String },

    /// The caller cancelled the command.
    #[error("Command cancelled: {command}")]
    Cancelled { command: String },

    /// A host name did not resolve.
    #[error("Failed to resolve host {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// The shell could not be started.
    #[error("Failed to start command: {0}")]
    Spawn(ExecError),

    /// Output did not parse.
    #[error(transparent)]
    Parse(ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl P4Error {
    /// Whether this error reports an untranslatable parameter.
    #[must_use]
    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Encoding { .. })
    }

    /// Whether this error is a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Convert an execution error, naming the command by its redacted form.
    pub(crate) fn from_exec(err: ExecError, redacted: &str) -> Self {
        match err {
            ExecError::Timeout { duration, .. } => Self::Timeout {
                command: redacted.to_string(),
                duration,
            },
            ExecError::Cancelled { .. } => Self::Cancelled {
                command: redacted.to_string(),
            },
            other => Self::Spawn(other),
        }
    }
}

impl From<ExecError> for P4Error {
    fn from(err: ExecError) -> Self {
        match err {
            ExecError::Timeout { command, duration } => Self::Timeout { command, duration },
            ExecError::Cancelled { command } => Self::Cancelled { command },
            other => Self::Spawn(other),
        }
    }
}

impl From<ParseError> for P4Error {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::InvalidRevision(text) => Self::InvalidRevision(text),
            other @ ParseError::InvalidDate(_) => Self::Parse(other),
        }
    }
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, P4Error>;
