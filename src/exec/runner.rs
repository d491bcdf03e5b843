//! The command execution contract consumed by the query layer.

use async_trait::async_trait;

use super::error::ExecError;

/// Captured result of one command invocation.
///
/// stdout and stderr are never merged; line order within each stream is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Process exit code (`-1` when terminated by a signal).
    pub exit_code: i32,
    /// Standard output, one entry per line.
    pub stdout: Vec<String>,
    /// Standard error, one entry per line.
    pub stderr: Vec<String>,
}

impl CommandOutput {
    /// Build an output from raw byte streams.
    #[must_use]
    pub fn from_bytes(exit_code: i32, stdout: &[u8], stderr: &[u8]) -> Self {
        Self {
            exit_code,
            stdout: split_lines(stdout),
            stderr: split_lines(stderr),
        }
    }

    /// Whether the command exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Whether anything non-blank was written to stderr.
    #[must_use]
    pub fn has_stderr(&self) -> bool {
        self.stderr.iter().any(|line| !line.trim().is_empty())
    }

    /// stderr lines joined with newlines.
    #[must_use]
    pub fn stderr_text(&self) -> String {
        self.stderr.join("\n")
    }

    /// stdout lines joined with newlines.
    #[must_use]
    pub fn stdout_text(&self) -> String {
        self.stdout.join("\n")
    }

    /// Whether either stream contains `needle`.
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        self.stdout
            .iter()
            .chain(self.stderr.iter())
            .any(|line| line.contains(needle))
    }
}

fn split_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(String::from)
        .collect()
}

/// Runs a composed command line and captures its output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command_line` to completion.
    ///
    /// # Errors
    ///
    /// Returns `ExecError` if the command cannot be spawned, times out or is
    /// cancelled. A non-zero exit is not an error at this layer.
    async fn run(&self, command_line: &str) -> Result<CommandOutput, ExecError>;
}
