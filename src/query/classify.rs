//! Classification of query results.
//!
//! The tool writes informational messages and errors to the same stream and
//! does not reliably set its exit code, so results are judged by exit code,
//! stderr presence and a few known stderr fragments.

use crate::error::{P4Error, Result};
use crate::exec::CommandOutput;

/// stderr fragment reported for an unknown changelist.
pub const NO_SUCH_CHANGELIST: &str = "no such changelist";

/// stderr fragments reporting that a parameter could not be converted to the
/// server's character set.
pub const ENCODING_MARKERS: &[&str] = &["could not be translated", "Translation of"];

/// stderr fragments reporting an untrusted server fingerprint.
pub const TRUST_MARKERS: &[&str] = &["authenticity of", "'p4 trust'"];

/// Hint attached to output when the server fingerprint is not trusted.
pub const TRUST_HINT: &str =
    "Server fingerprint is not trusted; set a trust fingerprint on the credentials or run 'p4 trust'";

/// How stderr output is treated when stdout also has content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StderrPolicy {
    /// Any stderr fails the query.
    Strict,
    /// stderr is accepted as long as stdout is non-empty.
    TolerateWithStdout,
}

/// Output of a successful query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    /// stdout lines.
    pub lines: Vec<String>,
    /// Set when the server fingerprint is not trusted.
    pub trust_hint: Option<String>,
}

impl RawOutput {
    /// stdout joined with newlines.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Outcome of a query that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    Output(RawOutput),
    NotFound,
}

fn mentions_any(output: &CommandOutput, markers: &[&str]) -> bool {
    output
        .stderr
        .iter()
        .any(|line| markers.iter().any(|m| line.contains(m)))
}

/// Classify the result of `command`.
///
/// # Errors
///
/// Returns `P4Error::Encoding` for an untranslatable parameter and
/// `P4Error::Command` for any other failure.
pub fn classify(command: &str, output: CommandOutput, policy: StderrPolicy) -> Result<Classified> {
    if mentions_any(&output, &[NO_SUCH_CHANGELIST]) {
        return Ok(Classified::NotFound);
    }

    if mentions_any(&output, ENCODING_MARKERS) {
        return Err(P4Error::Encoding {
            stderr: output.stderr_text(),
        });
    }

    if mentions_any(&output, TRUST_MARKERS) {
        tracing::warn!(hint = TRUST_HINT, stderr = %output.stderr_text(), "Untrusted server");
        return Ok(Classified::Output(RawOutput {
            lines: output.stdout,
            trust_hint: Some(TRUST_HINT.to_string()),
        }));
    }

    let tolerated = policy == StderrPolicy::TolerateWithStdout && !output.stdout.is_empty();
    if (output.success() && !output.has_stderr()) || tolerated {
        return Ok(Classified::Output(RawOutput {
            lines: output.stdout,
            trust_hint: None,
        }));
    }

    Err(P4Error::Command {
        command: command.to_string(),
        exit_code: output.exit_code,
        stderr: output.stderr_text(),
    })
}
