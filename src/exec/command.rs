//! Command-line construction for the `p4` client.
//!
//! Every query is run as one composed command string, so embedded values
//! (tickets, depot paths, client names) are quoted for the target shell.

use std::borrow::Cow;

/// Placeholder written in place of tickets and secrets in log output.
pub const REDACTED: &str = "********";

/// Quote a single value for the platform shell.
#[must_use]
pub fn quote(value: &str) -> Cow<'_, str> {
    shell_escape::escape(Cow::Borrowed(value))
}

/// Builder for a single `p4` invocation.
#[derive(Debug, Clone, Default)]
pub struct P4Command {
    binary: String,
    user: Option<String>,
    port: Option<String>,
    ticket: Option<String>,
    charset: Option<String>,
    host: Option<String>,
    args: Vec<String>,
}

impl P4Command {
    /// Create a new builder for the given `p4` binary.
    #[must_use]
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            ..Default::default()
        }
    }

    /// Set the `-u` user.
    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the `-p` server address.
    #[must_use]
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Set the `-P` session ticket.
    #[must_use]
    pub fn ticket(mut self, ticket: impl Into<String>) -> Self {
        self.ticket = Some(ticket.into());
        self
    }

    /// Set the `-C` character set, if any.
    #[must_use]
    pub fn charset(mut self, charset: Option<&str>) -> Self {
        self.charset = charset.map(String::from);
        self
    }

    /// Set the `-H` client host override.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Append one command argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several command arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Build the argument vector: global options first, then the command.
    #[must_use]
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(user) = &self.user {
            args.push("-u".to_string());
            args.push(user.clone());
        }

        if let Some(port) = &self.port {
            args.push("-p".to_string());
            args.push(port.clone());
        }

        if let Some(ticket) = &self.ticket {
            args.push("-P".to_string());
            args.push(ticket.clone());
        }

        if let Some(charset) = &self.charset {
            args.push("-C".to_string());
            args.push(charset.clone());
        }

        if let Some(host) = &self.host {
            args.push("-H".to_string());
            args.push(host.clone());
        }

        args.extend(self.args.iter().cloned());
        args
    }

    /// Render the full command line with every value quoted.
    #[must_use]
    pub fn render(&self) -> String {
        self.render_inner(false)
    }

    /// Render the command line with the ticket replaced, for logging.
    #[must_use]
    pub fn redacted(&self) -> String {
        self.render_inner(true)
    }

    fn render_inner(&self, redact: bool) -> String {
        let mut parts = vec![quote(&self.binary).into_owned()];
        let mut hide_next = false;
        for arg in self.build_args() {
            if hide_next {
                parts.push(REDACTED.to_string());
                hide_next = false;
                continue;
            }
            hide_next = redact && arg == "-P" && self.ticket.is_some();
            parts.push(quote(&arg).into_owned());
        }
        parts.join(" ")
    }
}

/// Render a command that pipes `secret` into `command` on stdin.
#[must_use]
pub fn pipe_secret(secret: &str, command: &str) -> String {
    #[cfg(unix)]
    {
        format!("printf '%s\\n' {} | {command}", quote(secret))
    }

    #[cfg(not(unix))]
    {
        format!("echo {}| {command}", quote(secret))
    }
}

/// Join commands so each runs only if the previous one succeeded.
#[must_use]
pub fn and_then(commands: &[String]) -> String {
    commands.join(" && ")
}
