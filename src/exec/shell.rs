//! Shell-backed command runner.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

use super::error::ExecError;
use super::runner::{CommandOutput, CommandRunner};

/// Default bound on a single command.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Default time between SIGTERM and SIGKILL when a command is stopped.
pub const DEFAULT_TERMINATE_GRACE: Duration = Duration::from_secs(5);

/// Runs command lines through the platform shell.
///
/// Each call spawns one child, waits for it with a timeout and collects both
/// output streams separately.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    timeout: Duration,
    grace: Duration,
    cancel: Option<CancellationToken>,
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellRunner {
    /// Create a runner with the default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            grace: DEFAULT_TERMINATE_GRACE,
            cancel: None,
        }
    }

    /// Set the per-command timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the grace period between SIGTERM and SIGKILL.
    #[must_use]
    pub fn with_terminate_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Stop running commands when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the per-command timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn shell_command(command_line: &str) -> Command {
        #[cfg(unix)]
        {
            // Own process group, so stopping the shell also reaches the
            // commands it started.
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command_line).process_group(0);
            cmd
        }

        #[cfg(not(unix))]
        {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command_line);
            cmd
        }
    }

    async fn wait(&self, child: &mut Child) -> Option<std::io::Result<ExitStatus>> {
        let cancelled = async {
            match &self.cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            result = tokio::time::timeout(self.timeout, child.wait()) => result.ok(),
            () = cancelled => None,
        }
    }

    /// Attempt graceful termination of the shell's process group, then force
    /// kill after the grace period.
    async fn terminate(&self, child: &mut Child) -> std::io::Result<()> {
        #[cfg(unix)]
        {
            use nix::sys::signal::{killpg, Signal};
            use nix::unistd::Pid;

            let Some(pid) = child.id() else {
                return Ok(());
            };
            let group = Pid::from_raw(i32::try_from(pid).unwrap_or(i32::MAX));
            let _ = killpg(group, Signal::SIGTERM);

            let waited = tokio::time::timeout(self.grace, child.wait()).await;
            // Stragglers that ignored SIGTERM, or outlived the shell.
            let _ = killpg(group, Signal::SIGKILL);
            if let Ok(result) = waited {
                return result.map(|_| ());
            }
        }

        child.kill().await
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command_line: &str) -> Result<CommandOutput, ExecError> {
        let mut child = Self::shell_command(command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(ExecError::from_io)?;

        let mut stdout = child.stdout.take();
        let mut stderr = child.stderr.take();
        let stdout_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(pipe) = stdout.as_mut() {
                pipe.read_to_end(&mut buf).await?;
            }
            Ok::<_, std::io::Error>(buf)
        });
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(pipe) = stderr.as_mut() {
                pipe.read_to_end(&mut buf).await?;
            }
            Ok::<_, std::io::Error>(buf)
        });

        let Some(status) = self.wait(&mut child).await else {
            let timed_out = !self
                .cancel
                .as_ref()
                .is_some_and(CancellationToken::is_cancelled);
            if let Err(e) = self.terminate(&mut child).await {
                tracing::warn!(error = %e, "Failed to terminate command");
            }
            stdout_task.abort();
            stderr_task.abort();
            return Err(if timed_out {
                ExecError::Timeout {
                    command: command_line.to_string(),
                    duration: self.timeout,
                }
            } else {
                ExecError::Cancelled {
                    command: command_line.to_string(),
                }
            });
        };
        let status = status?;

        let stdout = join_pipe(stdout_task).await?;
        let stderr = join_pipe(stderr_task).await?;

        Ok(CommandOutput::from_bytes(
            status.code().unwrap_or(-1),
            &stdout,
            &stderr,
        ))
    }
}

async fn join_pipe(
    task: tokio::task::JoinHandle<std::io::Result<Vec<u8>>>,
) -> Result<Vec<u8>, ExecError> {
    match task.await {
        Ok(result) => Ok(result?),
        Err(e) => Err(ExecError::Io(std::io::Error::other(e))),
    }
}
