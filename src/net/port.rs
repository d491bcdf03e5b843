//! `P4PORT` address handling.

use std::fmt;

const PROTOCOLS: &[&str] = &[
    "tcp", "tcp4", "tcp6", "tcp46", "tcp64", "ssl", "ssl4", "ssl6", "ssl46", "ssl64",
];

/// A parsed server address: `[protocol:]host:port` or a bare port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSpec {
    pub protocol: Option<String>,
    /// Host name or address; `localhost` for a bare port.
    pub host: String,
    pub port: String,
}

impl PortSpec {
    /// Parse a `P4PORT` value.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        let (protocol, rest) = match value.split_once(':') {
            Some((head, tail)) if PROTOCOLS.contains(&head) => (Some(head.to_string()), tail),
            _ => (None, value),
        };

        let (host, port) = match rest.rsplit_once(':') {
            Some((host, port)) => (host.trim_matches(['[', ']']), port),
            None => ("localhost", rest),
        };

        Self {
            protocol,
            host: host.to_string(),
            port: port.to_string(),
        }
    }

    /// Whether `address` (`host:port` as listed by `trust -l` or `tickets`)
    /// names this server, either by host name or by `resolved` address.
    #[must_use]
    pub fn matches(&self, address: &str, resolved: Option<&str>) -> bool {
        let other = Self::parse(address);
        if other.port != self.port {
            return false;
        }
        other.host.eq_ignore_ascii_case(&self.host)
            || resolved.is_some_and(|ip| other.host == ip)
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(protocol) = &self.protocol {
            write!(f, "{protocol}:")?;
        }
        write!(f, "{}:{}", self.host, self.port)
    }
}
