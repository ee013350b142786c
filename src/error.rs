//! Domain errors.
//!
//! Plumbing code wraps these in `anyhow::Error`; the variants themselves
//! are what the pipeline stages return.

use thiserror::Error;

/// Errors raised while loading, normalizing or dispatching a corpus.
#[derive(Debug, Error)]
pub enum StatError {
    /// Input is not valid JSON or is not shaped like `{"messages": [...]}`.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A message's `date` field could not be parsed.
    #[error("cannot parse timestamp '{raw}': {reason}")]
    TimestampParse { raw: String, reason: String },

    /// The requested report is not registered.
    #[error("unknown report '{name}' (valid reports: {valid})")]
    UnknownReport { name: String, valid: String },

    /// The viewer time zone is not a known IANA zone name.
    #[error("invalid time zone: {0}")]
    InvalidTimezone(String),
}

impl From<serde_json::Error> for StatError {
    fn from(err: serde_json::Error) -> Self {
        StatError::MalformedInput(err.to_string())
    }
}
