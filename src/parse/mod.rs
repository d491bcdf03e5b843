//! Parsers for `p4` text output.
//!
//! Every parser is a pure function over captured text. Each extraction rule
//! is its own function so it can be tested against a single fragment; only
//! [`parse_describe`] rejects its input; the others fall back to empty fields.

mod annotate;
mod changes;
mod client;
mod date;
mod describe;
mod error;
mod types;

use std::borrow::Cow;

pub use annotate::{
    filter_blank_lines, header_file, header_kind, header_revision, parse_annotate,
    parse_annotate_line,
};
pub use changes::{change_revision, parse_change_header, parse_changes, CHANGE_PREFIX};
pub use client::{
    client_name, client_root, client_summary, parse_client, parse_clients, parse_views,
    split_view_line, strip_comments, tagged_field, tagged_records, TAG_PREFIX, VIEW_MARKER,
};
pub use date::{parse_date, strip_pending, PENDING_MARKER};
pub use describe::{
    affected_files_block, describe_description, describe_header, differences_block,
    parse_affected_files, parse_describe, split_differences, split_paragraphs, DescribeHeader,
    AFFECTED_FILES_MARKER, DIFFERENCES_MARKER,
};
pub use error::ParseError;
pub use types::{
    Annotate, AnnotateLine, Change, ChangeFile, ChangeKind, Client, ClientSummary, ClientView,
};

/// Convert `\r\n` and lone `\r` line endings to `\n`.
#[must_use]
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}
