//! Client workspace spec parsing (`p4 client -o`, `p4 -ztag clients`).

use std::sync::LazyLock;

use regex::Regex;

use super::normalize_newlines;
use super::types::{Client, ClientSummary, ClientView};

/// Marker opening the view mapping block.
pub const VIEW_MARKER: &str = "View:";

static CLIENT_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Client:[ \t]*(\S+)").expect("valid regex"));

static ROOT_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Root:[ \t]*([^\n]*)$").expect("valid regex"));

/// Prefix of every field line in tagged output.
pub const TAG_PREFIX: &str = "... ";

/// Drop comment lines (first non-blank character `#`).
#[must_use]
pub fn strip_comments(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Value of the `Client:` field, or empty.
#[must_use]
pub fn client_name(spec: &str) -> String {
    CLIENT_FIELD
        .captures(spec)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

/// Value of the `Root:` field, or empty.
#[must_use]
pub fn client_root(spec: &str) -> String {
    ROOT_FIELD
        .captures(spec)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default()
}

/// Split one view line into its depot and workspace sides.
///
/// Sides are separated by the first whitespace run. A side wrapped in double
/// quotes may contain spaces. Returns `None` for a line with a single side.
#[must_use]
pub fn split_view_line(line: &str) -> Option<ClientView> {
    let line = line.trim();
    let (remote, rest) = take_token(line)?;
    let (local, _) = take_token(rest.trim_start())?;
    Some(ClientView::new(unquote(remote), unquote(local)))
}

fn take_token(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }

    // Exclusion and overlay prefixes sit outside the quotes: -"//depot/a b/..."
    let prefix_len = usize::from(text.starts_with(['-', '+']));
    if text[prefix_len..].starts_with('"') {
        let body = &text[prefix_len + 1..];
        let close = body.find('"')?;
        let token = &text[..prefix_len + 1 + close + 1];
        let rest = &text[token.len()..];
        return Some((token, rest));
    }

    match text.find(char::is_whitespace) {
        Some(idx) => Some((&text[..idx], &text[idx..])),
        None => Some((text, "")),
    }
}

/// Remove the quotes of a quoted token, keeping any `-`/`+` prefix.
fn unquote(token: &str) -> String {
    token
        .strip_suffix('"')
        .and_then(|t| {
            let open = t.find('"')?;
            Some(format!("{}{}", &t[..open], &t[open + 1..]))
        })
        .unwrap_or_else(|| token.to_string())
}

/// Parse the `View:` block, keeping line order.
#[must_use]
pub fn parse_views(spec: &str) -> Vec<ClientView> {
    let Some(start) = spec.find(VIEW_MARKER) else {
        return Vec::new();
    };

    spec[start + VIEW_MARKER.len()..]
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(split_view_line)
        .collect()
}

/// Parse the output of `p4 client -o`.
///
/// Never fails: missing fields are left empty.
#[must_use]
pub fn parse_client(raw: &str) -> Client {
    let spec = strip_comments(&normalize_newlines(raw));
    Client {
        name: client_name(&spec),
        root: client_root(&spec),
        views: parse_views(&spec),
    }
}

/// Split a tagged field line into key and value.
///
/// `... Host build-07` gives `("Host", "build-07")`; a field with no value
/// gives an empty value.
#[must_use]
pub fn tagged_field(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_end().strip_prefix(TAG_PREFIX)?;
    Some(rest.split_once(' ').unwrap_or((rest, "")))
}

/// Group `p4 -ztag clients` output into one line group per workspace.
///
/// A record starts at its `... client` line. Lines before the first record
/// and lines that are not tagged fields are dropped.
#[must_use]
pub fn tagged_records<S: AsRef<str>>(lines: &[S]) -> Vec<Vec<&str>> {
    let mut records: Vec<Vec<&str>> = Vec::new();

    for line in lines {
        let line = line.as_ref();
        match tagged_field(line) {
            Some(("client", _)) => records.push(vec![line]),
            Some(_) => {
                if let Some(record) = records.last_mut() {
                    record.push(line);
                }
            }
            None => {}
        }
    }

    records
}

/// Summarize one tagged client record.
#[must_use]
pub fn client_summary(record: &[&str]) -> ClientSummary {
    let mut summary = ClientSummary::default();
    for (key, value) in record.iter().filter_map(|line| tagged_field(line)) {
        match key {
            "client" => summary.name = value.to_string(),
            "Root" => summary.root = value.to_string(),
            "Host" => summary.host = value.to_string(),
            _ => {}
        }
    }
    summary
}

/// Parse a `p4 -ztag clients` listing.
///
/// ```text
/// ... client alice-ws
/// ... Owner alice
/// ... Root /home/alice/ws
/// ... Host build-07
/// ```
#[must_use]
pub fn parse_clients<S: AsRef<str>>(lines: &[S]) -> Vec<ClientSummary> {
    tagged_records(lines)
        .iter()
        .map(|record| client_summary(record))
        .collect()
}
