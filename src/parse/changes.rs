//! `p4 changes` summary parsing.

use std::sync::LazyLock;

use regex::Regex;

use super::date::{parse_date, PENDING_MARKER};
use super::types::Change;

/// Prefix of every record header line.
pub const CHANGE_PREFIX: &str = "Change ";

static REVISION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Change (\d+)").expect("valid regex"));

static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" on (\d{4}/\d{2}/\d{2}(?: \d{2}:\d{2}:\d{2})?)").expect("valid regex")
});

static USER_WORKSPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" by ([^@\s]+)@(\S+)").expect("valid regex"));

/// Revision number of a `Change ` header line, or empty.
#[must_use]
pub fn change_revision(line: &str) -> &str {
    REVISION
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str())
}

/// Build a record from one `Change ` header line.
///
/// Unmatched fields stay empty; an unparseable date stays `None`.
#[must_use]
pub fn parse_change_header(line: &str) -> Change {
    let (user, workspace) = USER_WORKSPACE
        .captures(line)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .unwrap_or_default();

    let date = DATE
        .captures(line)
        .and_then(|caps| parse_date(&caps[1]).ok());

    Change {
        revision: change_revision(line).to_string(),
        workspace,
        user,
        date,
        is_pending: line.contains(PENDING_MARKER),
        ..Default::default()
    }
}

/// Parse a bulk `p4 changes -l` listing.
///
/// Lines starting with `Change ` open a record; every other line is folded
/// into the current record's description with tabs turned into spaces. Lines
/// before the first header are dropped. This scan never fails.
#[must_use]
pub fn parse_changes<S: AsRef<str>>(lines: &[S]) -> Vec<Change> {
    let mut changes: Vec<Change> = Vec::new();

    for line in lines {
        let line = line.as_ref();
        if line.starts_with(CHANGE_PREFIX) {
            changes.push(parse_change_header(line));
            continue;
        }

        let Some(current) = changes.last_mut() else {
            continue;
        };
        let text = line.replace('\t', " ");
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        if !current.description.is_empty() {
            current.description.push(' ');
        }
        current.description.push_str(text);
    }

    changes
}
