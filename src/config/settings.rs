//! Connection settings and credentials.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// How the `p4` binary is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct P4Config {
    /// Binary name or path of the command-line client.
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Upper bound on a single command, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Seconds between SIGTERM and SIGKILL when a command is stopped.
    #[serde(default = "default_terminate_grace_secs")]
    pub terminate_grace_secs: u64,

    /// Character set passed as `-C`, for unicode-mode servers.
    #[serde(default)]
    pub charset: Option<String>,
}

fn default_binary() -> String {
    "p4".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_terminate_grace_secs() -> u64 {
    5
}

impl Default for P4Config {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            timeout_secs: default_timeout_secs(),
            terminate_grace_secs: default_terminate_grace_secs(),
            charset: None,
        }
    }
}

impl P4Config {
    /// Parse settings from a TOML document supplied by the caller.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the document is not valid TOML or has
    /// fields of the wrong type.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    /// Per-command timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Grace period before a stopped command is killed.
    #[must_use]
    pub fn terminate_grace(&self) -> Duration {
        Duration::from_secs(self.terminate_grace_secs)
    }
}

/// Who the client authenticates as, and where.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Perforce user name.
    pub user: String,
    /// Password, or a ready-made ticket when `secret_is_ticket` is set.
    pub secret: String,
    /// Server address (`P4PORT`), e.g. `ssl:perforce.example.com:1666`.
    pub port: String,
    /// Expected server fingerprint; empty skips trust establishment.
    pub trust_fingerprint: String,
    pub secret_is_ticket: bool,
}

impl Credentials {
    /// Credentials that log in with a password on first use.
    #[must_use]
    pub fn with_password(
        user: impl Into<String>,
        password: impl Into<String>,
        port: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            secret: password.into(),
            port: port.into(),
            trust_fingerprint: String::new(),
            secret_is_ticket: false,
        }
    }

    /// Credentials carrying an existing session ticket.
    #[must_use]
    pub fn with_ticket(
        user: impl Into<String>,
        ticket: impl Into<String>,
        port: impl Into<String>,
    ) -> Self {
        Self {
            secret_is_ticket: true,
            ..Self::with_password(user, ticket, port)
        }
    }

    /// Set the server fingerprint to trust before logging in.
    #[must_use]
    pub fn trust(mut self, fingerprint: impl Into<String>) -> Self {
        self.trust_fingerprint = fingerprint.into();
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("secret", &crate::exec::REDACTED)
            .field("port", &self.port)
            .field("trust_fingerprint", &self.trust_fingerprint)
            .field("secret_is_ticket", &self.secret_is_ticket)
            .finish()
    }
}
