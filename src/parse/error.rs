//! Parser error types.

/// Errors raised by the validating parsers.
///
/// Only [`parse_describe`](super::parse_describe) validates its input; the
/// other parsers fall back to empty fields instead of failing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No `Change N by user@client on date` header was found.
    #[error("Not a describe result, no change header in: {0:?}")]
    InvalidRevision(String),

    /// The header date did not match any known format.
    #[error("Invalid change date: {0:?}")]
    InvalidDate(String),
}
