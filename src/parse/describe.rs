//! `p4 describe` output parsing.
//!
//! ```text
//! Change 4242 by alice@alice-ws on 2024/01/02 10:00:00
//!
//!     Fix the frobnicator
//!
//! Affected files ...
//!
//! ... //depot/main/frob.c#3 edit
//!
//! Differences ...
//!
//! ==== //depot/main/frob.c#3 (text) ====
//! ```

use std::sync::LazyLock;

use regex::Regex;

use super::date::{parse_date, strip_pending};
use super::error::ParseError;
use super::normalize_newlines;
use super::types::{Change, ChangeFile, ChangeKind};

/// Marker opening the file list.
pub const AFFECTED_FILES_MARKER: &str = "Affected files ...";

/// Marker opening the per-file diff section.
pub const DIFFERENCES_MARKER: &str = "Differences ...";

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^change (\d+) by ([^@\s]+)@(\S+) on ([^\n]+)$").expect("valid regex")
});

static FILE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.\.\. (.+)#(\d+) (\S+)").expect("valid regex"));

static DIFF_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^==== ([^#\n]+)#\d+[^\n]*$").expect("valid regex"));

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n+").expect("valid regex"));

/// Fields of a describe header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeHeader<'a> {
    pub revision: &'a str,
    pub user: &'a str,
    pub workspace: &'a str,
    pub date: &'a str,
    /// Byte offset just past the header line.
    pub end: usize,
}

/// Find the `Change N by user@client on date` header.
#[must_use]
pub fn describe_header(text: &str) -> Option<DescribeHeader<'_>> {
    let caps = HEADER.captures(text)?;
    let whole = caps.get(0)?;
    Some(DescribeHeader {
        revision: caps.get(1)?.as_str(),
        user: caps.get(2)?.as_str(),
        workspace: caps.get(3)?.as_str(),
        date: caps.get(4)?.as_str().trim(),
        end: whole.end(),
    })
}

/// Collapse the description between the header and the file list.
///
/// Lines are trimmed, blank lines dropped and the rest joined by spaces.
#[must_use]
pub fn describe_description(text: &str, header_end: usize) -> String {
    let body = &text[header_end..];
    let body = match body.find(AFFECTED_FILES_MARKER) {
        Some(idx) => &body[..idx],
        None => body.find(DIFFERENCES_MARKER).map_or(body, |idx| &body[..idx]),
    };
    join_words(body.lines())
}

/// Slice out the affected-files block.
///
/// Runs from the `Affected files ...` marker to `Differences ...`, or to end
/// of input when there is no diff section. Empty if the marker is absent.
#[must_use]
pub fn affected_files_block(text: &str) -> &str {
    let Some(start) = text.find(AFFECTED_FILES_MARKER) else {
        return "";
    };
    let block = &text[start + AFFECTED_FILES_MARKER.len()..];
    match block.find(DIFFERENCES_MARKER) {
        Some(end) => &block[..end],
        None => block,
    }
}

/// Slice out the diff section, if present.
#[must_use]
pub fn differences_block(text: &str) -> Option<&str> {
    let start = text.find(DIFFERENCES_MARKER)?;
    Some(&text[start + DIFFERENCES_MARKER.len()..])
}

/// Parse `... //path#rev action` lines, skipping anything else.
#[must_use]
pub fn parse_affected_files(block: &str) -> Vec<ChangeFile> {
    block
        .lines()
        .filter_map(|line| {
            let caps = FILE_LINE.captures(line.trim_end())?;
            Some(ChangeFile::new(
                &caps[1],
                &caps[2],
                ChangeKind::from_action(&caps[3]),
            ))
        })
        .collect()
}

/// Split the diff section into `(path, paragraphs)` per `==== ` block.
#[must_use]
pub fn split_differences(block: &str) -> Vec<(String, Vec<String>)> {
    let headers: Vec<_> = DIFF_HEADER.captures_iter(block).collect();
    let mut out = Vec::with_capacity(headers.len());

    for (i, caps) in headers.iter().enumerate() {
        let (Some(whole), Some(path)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let body_end = headers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(block.len(), |m| m.start());
        let body = &block[whole.end()..body_end];
        out.push((path.as_str().trim().to_string(), split_paragraphs(body)));
    }

    out
}

/// Split a diff body on empty lines.
///
/// A line holding only a space is an unchanged empty source line in unified
/// diffs and stays inside its hunk.
#[must_use]
pub fn split_paragraphs(body: &str) -> Vec<String> {
    PARAGRAPH_BREAK
        .split(body)
        .map(|p| p.trim_matches('\n'))
        .filter(|p| !p.trim().is_empty())
        .map(String::from)
        .collect()
}

/// Parse the output of `p4 describe` for one changelist.
///
/// With `with_differences`, each file gets the diff paragraphs of the
/// `==== ` block naming exactly its path; files without a block keep empty
/// differences.
///
/// # Errors
///
/// Returns `ParseError::InvalidRevision` when the change header is missing,
/// which is how the tool reports an unknown changelist on some servers, and
/// `ParseError::InvalidDate` when the header date cannot be parsed.
pub fn parse_describe(raw: &str, with_differences: bool) -> Result<Change, ParseError> {
    let text = normalize_newlines(raw);

    let header = describe_header(&text).ok_or_else(|| {
        ParseError::InvalidRevision(text.lines().next().unwrap_or_default().to_string())
    })?;

    let (_, is_pending) = strip_pending(header.date);
    let date = parse_date(header.date)?;
    let description = describe_description(&text, header.end);
    let mut files = parse_affected_files(affected_files_block(&text));

    if with_differences {
        if let Some(block) = differences_block(&text) {
            let diffs = split_differences(block);
            for file in &mut files {
                if let Some((_, paragraphs)) = diffs.iter().find(|(path, _)| *path == file.path) {
                    file.differences.clone_from(paragraphs);
                }
            }
        }
    }

    Ok(Change {
        revision: header.revision.to_string(),
        workspace: header.workspace.to_string(),
        user: header.user.to_string(),
        date: Some(date),
        is_pending,
        description,
        files,
    })
}

fn join_words<'a>(lines: impl Iterator<Item = &'a str>) -> String {
    lines
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
