//! Lookups in the local trust and ticket stores.

use crate::auth::find_ticket;
use crate::config::P4Config;
use crate::error::{P4Error, Result};
use crate::exec::{CommandRunner, P4Command};
use crate::query::{classify, Classified, StderrPolicy};

use super::port::PortSpec;
use super::resolve::resolve_host;

async fn run_local<R>(runner: &R, config: &P4Config, args: &[&str]) -> Result<Vec<String>>
where
    R: CommandRunner + ?Sized,
{
    let cmd = P4Command::new(&config.binary)
        .charset(config.charset.as_deref())
        .args(args.iter().copied());
    let rendered = cmd.render();
    tracing::debug!(command = %rendered, "Reading local store");

    let output = runner
        .run(&rendered)
        .await
        .map_err(|e| P4Error::from_exec(e, &rendered))?;

    match classify(&rendered, output, StderrPolicy::TolerateWithStdout)? {
        Classified::Output(raw) => Ok(raw.lines),
        Classified::NotFound => Ok(Vec::new()),
    }
}

/// Best-effort address of the server host, for matching store entries.
async fn resolved_address(spec: &PortSpec) -> Option<String> {
    match resolve_host(&spec.host).await {
        Ok(ip) => Some(ip.to_string()),
        Err(e) => {
            tracing::debug!(error = %e, "Matching store entries by host name only");
            None
        }
    }
}

/// Fingerprint recorded for `port` in the local trust file (`p4 trust -l`).
///
/// Entries are keyed by `address:port`; the server host is resolved so an
/// entry recorded under its IP address also matches.
///
/// # Errors
///
/// Returns `P4Error::Command` if the listing fails.
pub async fn trusted_fingerprint<R>(runner: &R, config: &P4Config, port: &str) -> Result<Option<String>>
where
    R: CommandRunner + ?Sized,
{
    let spec = PortSpec::parse(port);
    let lines = run_local(runner, config, &["trust", "-l"]).await?;
    let resolved = resolved_address(&spec).await;

    Ok(lines.iter().find_map(|line| {
        let mut tokens = line.split_whitespace();
        let address = tokens.next()?;
        let fingerprint = tokens.next()?;
        spec.matches(address, resolved.as_deref())
            .then(|| fingerprint.to_string())
    }))
}

/// Ticket for `user` on `port` from the local ticket store (`p4 tickets`).
///
/// # Errors
///
/// Returns `P4Error::Command` if the listing fails.
pub async fn local_ticket<R>(
    runner: &R,
    config: &P4Config,
    user: &str,
    port: &str,
) -> Result<Option<String>>
where
    R: CommandRunner + ?Sized,
{
    let spec = PortSpec::parse(port);
    let lines = run_local(runner, config, &["tickets"]).await?;
    let resolved = resolved_address(&spec).await;

    let for_server: Vec<&String> = lines
        .iter()
        .filter(|line| {
            line.split_whitespace()
                .next()
                .is_some_and(|address| spec.matches(address, resolved.as_deref()))
        })
        .collect();

    Ok(find_ticket(&for_server, user))
}
