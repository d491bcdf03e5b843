//! `p4 annotate` output parsing.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{Annotate, AnnotateLine, ChangeKind};

static DATA_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):(.*)$").expect("valid regex"));

/// File path of an annotate header: text before the first ` -`.
#[must_use]
pub fn header_file(header: &str) -> &str {
    header.find(" -").map_or(header, |idx| &header[..idx])
}

/// Revision of an annotate header: text between ` change ` and the next space.
#[must_use]
pub fn header_revision(header: &str) -> &str {
    let Some(idx) = header.find(" change ") else {
        return "";
    };
    let rest = &header[idx + " change ".len()..];
    rest.split(' ').next().unwrap_or_default()
}

/// Change kind of an annotate header: text between ` - ` and ` change `.
#[must_use]
pub fn header_kind(header: &str) -> Option<ChangeKind> {
    let start = header.find(" - ")? + " - ".len();
    let end = header[start..].find(" change ")? + start;
    ChangeKind::from_annotate(&header[start..end])
}

/// Parse one `<revision>: text` line.
#[must_use]
pub fn parse_annotate_line(line: &str, line_number: usize) -> Option<AnnotateLine> {
    let caps = DATA_LINE.captures(line)?;
    let text = &caps[2];
    Some(AnnotateLine {
        revision: caps[1].to_string(),
        text: text.strip_prefix(' ').unwrap_or(text).to_string(),
        line_number,
    })
}

/// Parse annotate output whose blank lines the caller already removed.
///
/// The first line is the header (`file.txt - edit change 42 (text)`), the rest
/// are `<revision>: text` data lines; other lines are skipped. Each data line
/// is numbered by its position after the header in `lines`, so skipped lines
/// still count.
#[must_use]
pub fn parse_annotate<S: AsRef<str>>(lines: &[S]) -> Annotate {
    let Some((header, data)) = lines.split_first() else {
        return Annotate::default();
    };
    let header = header.as_ref();

    let lines = data
        .iter()
        .enumerate()
        .filter_map(|(i, line)| parse_annotate_line(line.as_ref(), i + 1))
        .collect();

    Annotate {
        file: header_file(header).to_string(),
        revision: header_revision(header).to_string(),
        change: header_kind(header),
        lines,
    }
}

/// Drop blank lines, as expected by [`parse_annotate`].
#[must_use]
pub fn filter_blank_lines(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect()
}
