//! Password login through the `p4` client.

use crate::config::Credentials;
use crate::error::{P4Error, Result};
use crate::exec::{and_then, pipe_secret, CommandOutput, CommandRunner, P4Command, REDACTED};

/// Output fragment of `p4 trust` when the fingerprint is already installed.
pub const TRUST_ALREADY_ESTABLISHED: &str = "already established";

/// A composed login command and its loggable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCommand {
    pub command: String,
    pub redacted: String,
}

/// Compose trust (optional), login and ticket listing into one command line.
#[must_use]
pub fn login_command(binary: &str, creds: &Credentials, charset: Option<&str>) -> LoginCommand {
    let base = || {
        P4Command::new(binary)
            .user(&creds.user)
            .port(&creds.port)
            .charset(charset)
    };

    let trust = (!creds.trust_fingerprint.is_empty()).then(|| {
        P4Command::new(binary)
            .port(&creds.port)
            .charset(charset)
            .args(["trust", "-i", creds.trust_fingerprint.as_str()])
            .render()
    });
    let login = base().arg("login").render();
    let tickets = base().arg("tickets").render();

    let compose = |secret: &str| {
        let mut steps: Vec<String> = trust.iter().cloned().collect();
        steps.push(pipe_secret(secret, &login));
        steps.push(tickets.clone());
        and_then(&steps)
    };

    LoginCommand {
        command: compose(&creds.secret),
        redacted: compose(REDACTED),
    }
}

/// Find the ticket for `user` in `p4 tickets` output.
///
/// The ticket is the third whitespace-separated token of the first line
/// containing `(user)`:
///
/// ```text
/// perforce:1666 (alice) 5B5E2F2C8A1D40F7AE2F3C1D9B0A6E44
/// ```
#[must_use]
pub fn find_ticket<S: AsRef<str>>(lines: &[S], user: &str) -> Option<String> {
    let marker = format!("({user})");
    lines
        .iter()
        .map(AsRef::as_ref)
        .find(|line| line.contains(&marker))
        .and_then(|line| line.split_whitespace().nth(2))
        .map(String::from)
}

fn check_login(output: &CommandOutput) -> Result<()> {
    if output.success() && !output.has_stderr() {
        return Ok(());
    }
    Err(P4Error::Authentication {
        exit_code: output.exit_code,
        stderr: output.stderr_text(),
    })
}

/// Log in with a password and return the session ticket.
///
/// When the trust step reports the fingerprint as already established, the
/// whole command is retried once as-is.
///
/// # Errors
///
/// Returns `P4Error::Authentication` on a non-zero exit or any stderr output,
/// and `P4Error::TicketNotFound` when the ticket listing lacks the user.
pub async fn login<R>(
    runner: &R,
    binary: &str,
    creds: &Credentials,
    charset: Option<&str>,
) -> Result<String>
where
    R: CommandRunner + ?Sized,
{
    let cmd = login_command(binary, creds, charset);
    tracing::info!(user = %creds.user, port = %creds.port, "Logging in");
    tracing::debug!(command = %cmd.redacted, "Running login");

    let mut output = runner
        .run(&cmd.command)
        .await
        .map_err(|e| P4Error::from_exec(e, &cmd.redacted))?;

    if !creds.trust_fingerprint.is_empty() && output.mentions(TRUST_ALREADY_ESTABLISHED) {
        tracing::warn!(port = %creds.port, "Trust already established, retrying login");
        output = runner
            .run(&cmd.command)
            .await
            .map_err(|e| P4Error::from_exec(e, &cmd.redacted))?;
    }

    check_login(&output)?;

    find_ticket(&output.stdout, &creds.user).ok_or_else(|| P4Error::TicketNotFound {
        user: creds.user.clone(),
        port: creds.port.clone(),
    })
}
