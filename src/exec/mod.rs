//! External command execution.
//!
//! The query layer only sees the [`CommandRunner`] contract: run one command
//! line, get back the exit code and the stdout/stderr lines. [`ShellRunner`]
//! is the production implementation; tests substitute scripted runners.

mod command;
mod error;
mod runner;
mod shell;

pub use command::{and_then, pipe_secret, quote, P4Command, REDACTED};
pub use error::ExecError;
pub use runner::{CommandOutput, CommandRunner};
pub use shell::{ShellRunner, DEFAULT_TERMINATE_GRACE, DEFAULT_TIMEOUT};
