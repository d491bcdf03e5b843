//! Query operations against a Perforce server.

use crate::auth::{login, TicketCache, TicketKey};
use crate::config::{Credentials, P4Config};
use crate::error::{P4Error, Result};
use crate::exec::{CommandRunner, P4Command, ShellRunner};
use crate::parse::{
    change_revision, client_summary, filter_blank_lines, parse_annotate, parse_changes,
    parse_client, parse_clients, parse_describe, tagged_records, Annotate, Change, Client,
    ClientSummary, CHANGE_PREFIX,
};

use super::classify::{classify, Classified, RawOutput, StderrPolicy};

/// Client for one user on one server.
///
/// Owns the ticket cache: the first authenticated query logs in (unless the
/// credentials already carry a ticket) and every later query reuses the
/// ticket. Share a client across tasks with `Arc` to share its cache.
#[derive(Debug)]
pub struct P4Client<R = ShellRunner> {
    runner: R,
    config: P4Config,
    creds: Credentials,
    tickets: TicketCache,
}

impl P4Client<ShellRunner> {
    /// Create a client that runs commands through the platform shell.
    #[must_use]
    pub fn new(creds: Credentials, config: P4Config) -> Self {
        let runner = ShellRunner::new()
            .with_timeout(config.timeout())
            .with_terminate_grace(config.terminate_grace());
        Self::with_runner(creds, config, runner)
    }
}

impl<R: CommandRunner> P4Client<R> {
    /// Create a client with a custom command runner.
    #[must_use]
    pub fn with_runner(creds: Credentials, config: P4Config, runner: R) -> Self {
        let tickets = if creds.secret_is_ticket {
            TicketCache::seeded(
                TicketKey::new(&creds.user, &creds.port),
                creds.secret.clone(),
            )
        } else {
            TicketCache::new()
        };

        Self {
            runner,
            config,
            creds,
            tickets,
        }
    }

    /// Get the credentials.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.creds
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &P4Config {
        &self.config
    }

    /// Get the command runner.
    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Get the ticket cache.
    #[must_use]
    pub fn tickets(&self) -> &TicketCache {
        &self.tickets
    }

    /// Session ticket for the configured user and server.
    ///
    /// Cached tickets are returned without contacting the server.
    ///
    /// # Errors
    ///
    /// Returns `P4Error::Authentication` or `P4Error::TicketNotFound` when
    /// the login fails.
    pub async fn ticket(&self) -> Result<String> {
        let key = TicketKey::new(&self.creds.user, &self.creds.port);
        self.tickets
            .get_or_login(&key, || {
                login(
                    &self.runner,
                    &self.config.binary,
                    &self.creds,
                    self.config.charset.as_deref(),
                )
            })
            .await
    }

    fn base_command(&self, ticket: &str) -> P4Command {
        P4Command::new(&self.config.binary)
            .user(&self.creds.user)
            .port(&self.creds.port)
            .ticket(ticket)
            .charset(self.config.charset.as_deref())
    }

    async fn run(&self, cmd: &P4Command, policy: StderrPolicy) -> Result<Classified> {
        let redacted = cmd.redacted();
        tracing::debug!(command = %redacted, "Running query");

        let output = self
            .runner
            .run(&cmd.render())
            .await
            .map_err(|e| P4Error::from_exec(e, &redacted))?;

        classify(&redacted, output, policy)
    }

    async fn query<I, S>(&self, args: I, policy: StderrPolicy) -> Result<Classified>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ticket = self.ticket().await?;
        let cmd = self.base_command(&ticket).args(args);
        self.run(&cmd, policy).await
    }

    /// Raw `p4 describe` output for one changelist.
    ///
    /// Returns `None` when the server reports no such changelist.
    ///
    /// # Errors
    ///
    /// Returns `P4Error::Encoding` for an untranslatable parameter and
    /// `P4Error::Command` for other failures.
    pub async fn describe(
        &self,
        revision: u64,
        with_differences: bool,
    ) -> Result<Option<RawOutput>> {
        let flag = if with_differences { "-du" } else { "-s" };
        let revision = revision.to_string();
        match self
            .query(["describe", flag, revision.as_str()], StderrPolicy::Strict)
            .await?
        {
            Classified::Output(raw) => Ok(Some(raw)),
            Classified::NotFound => Ok(None),
        }
    }

    /// Describe one changelist as a [`Change`].
    ///
    /// # Errors
    ///
    /// As [`describe`](Self::describe), plus `P4Error::InvalidRevision` when
    /// the output has no change header and `P4Error::Untrusted` when an
    /// untrusted server printed nothing.
    pub async fn describe_change(
        &self,
        revision: u64,
        with_differences: bool,
    ) -> Result<Option<Change>> {
        let Some(raw) = self.describe(revision, with_differences).await? else {
            return Ok(None);
        };
        let raw = require_output(raw)?;
        Ok(Some(parse_describe(&raw.text(), with_differences)?))
    }

    /// Attach annotations to every file of `change` that still exists at its
    /// revision.
    ///
    /// # Errors
    ///
    /// Fails on the first annotate query that fails.
    pub async fn annotate_change(&self, mut change: Change) -> Result<Change> {
        for file in &mut change.files {
            if file.kind.is_deletion() {
                continue;
            }
            file.annotate = Some(self.annotate_file(&file.file_spec()).await?);
        }
        Ok(change)
    }

    /// Raw `p4 client -o` output.
    ///
    /// # Errors
    ///
    /// Returns `P4Error::Command` if the query fails.
    pub async fn client_spec_raw(&self, name: &str) -> Result<RawOutput> {
        let classified = self
            .query(["client", "-o", name], StderrPolicy::Strict)
            .await?;
        Ok(into_output(classified))
    }

    /// Read a client workspace spec.
    ///
    /// # Errors
    ///
    /// Returns `P4Error::Command` if the query fails.
    pub async fn client_spec(&self, name: &str) -> Result<Client> {
        let raw = require_output(self.client_spec_raw(name).await?)?;
        Ok(parse_client(&raw.text()))
    }

    /// Raw `p4 changes -l -t` listing for `path`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `P4Error::Command` if the query fails.
    pub async fn changes(&self, path: &str, max: Option<u32>) -> Result<RawOutput> {
        let mut args = vec!["changes".to_string(), "-l".to_string(), "-t".to_string()];
        if let Some(max) = max {
            args.push("-m".to_string());
            args.push(max.to_string());
        }
        args.push(path.to_string());

        let classified = self.query(args, StderrPolicy::Strict).await?;
        Ok(into_output(classified))
    }

    /// Changelist summaries for `path`, without per-file detail.
    ///
    /// # Errors
    ///
    /// Returns `P4Error::Command` if the query fails.
    pub async fn change_summaries(&self, path: &str, max: Option<u32>) -> Result<Vec<Change>> {
        let raw = require_output(self.changes(path, max).await?)?;
        Ok(parse_changes(&raw.lines))
    }

    /// Read the summary of a single changelist.
    ///
    /// # Errors
    ///
    /// Returns `P4Error::Command` if the query fails.
    pub async fn change(&self, revision: u64) -> Result<Option<Change>> {
        let range = format!("//...@{revision},@{revision}");
        let classified = self
            .query(
                ["changes", "-l", "-t", "-m", "1", range.as_str()],
                StderrPolicy::Strict,
            )
            .await?;

        let Classified::Output(raw) = classified else {
            return Ok(None);
        };
        let raw = require_output(raw)?;
        let wanted = revision.to_string();
        Ok(parse_changes(&raw.lines)
            .into_iter()
            .find(|change| change.revision == wanted))
    }

    /// Changelists strictly between `from` and `to` touching `path`.
    ///
    /// The server query is inclusive (`@from,@to`); both boundary revisions
    /// are dropped from the result. stderr is tolerated when stdout has
    /// content.
    ///
    /// # Errors
    ///
    /// Returns `P4Error::Command` if the query fails.
    pub async fn raw_changes_between(&self, path: &str, from: u64, to: u64) -> Result<Vec<u64>> {
        let spec = format!("{path}@{from},@{to}");
        let classified = self
            .query(["changes", spec.as_str()], StderrPolicy::TolerateWithStdout)
            .await?;

        Ok(into_output(classified)
            .lines
            .iter()
            .filter(|line| line.starts_with(CHANGE_PREFIX))
            .filter_map(|line| change_revision(line).parse::<u64>().ok())
            .filter(|rev| *rev != from && *rev != to)
            .collect())
    }

    /// Raw `p4 annotate -c` output with blank lines removed.
    ///
    /// # Errors
    ///
    /// Returns `P4Error::Command` if the query fails.
    pub async fn annotate(&self, file_spec: &str) -> Result<RawOutput> {
        let classified = self
            .query(["annotate", "-c", file_spec], StderrPolicy::Strict)
            .await?;
        let mut raw = into_output(classified);
        raw.lines = filter_blank_lines(raw.lines);
        Ok(raw)
    }

    /// Per-line authorship of one file.
    ///
    /// # Errors
    ///
    /// Returns `P4Error::Command` if the query fails.
    pub async fn annotate_file(&self, file_spec: &str) -> Result<Annotate> {
        let raw = require_output(self.annotate(file_spec).await?)?;
        Ok(parse_annotate(&raw.lines))
    }

    /// Tagged `p4 clients` records of the user's workspaces bound to `host`.
    ///
    /// The listing is not filtered by the server, so records whose `Host`
    /// field differs from `host` are dropped here. Workspaces with no host
    /// restriction are dropped too.
    ///
    /// # Errors
    ///
    /// Returns `P4Error::Command` if the query fails.
    pub async fn clients_by_host(&self, host: &str) -> Result<RawOutput> {
        let ticket = self.ticket().await?;
        let cmd = self
            .base_command(&ticket)
            .host(host)
            .args(["-ztag", "clients", "-u", self.creds.user.as_str()]);
        let mut raw = into_output(self.run(&cmd, StderrPolicy::Strict).await?);

        let lines: Vec<String> = tagged_records(&raw.lines)
            .into_iter()
            .filter(|record| client_summary(record).host == host)
            .flatten()
            .map(String::from)
            .collect();
        raw.lines = lines;
        Ok(raw)
    }

    /// Workspaces of the user bound to `host`.
    ///
    /// # Errors
    ///
    /// Returns `P4Error::Command` if the query fails and `P4Error::Untrusted`
    /// when an untrusted server printed nothing.
    pub async fn client_summaries_by_host(&self, host: &str) -> Result<Vec<ClientSummary>> {
        let raw = require_output(self.clients_by_host(host).await?)?;
        Ok(parse_clients(&raw.lines))
    }
}

/// Queries that do not name a changelist treat "not found" as empty output.
fn into_output(classified: Classified) -> RawOutput {
    match classified {
        Classified::Output(raw) => raw,
        Classified::NotFound => RawOutput::default(),
    }
}

/// Parsed results cannot carry the trust hint, so an untrusted server that
/// printed nothing becomes an error.
fn require_output(raw: RawOutput) -> Result<RawOutput> {
    match raw.trust_hint {
        Some(hint) if raw.lines.is_empty() => Err(P4Error::Untrusted { hint }),
        trust_hint => Ok(RawOutput { trust_hint, ..raw }),
    }
}
