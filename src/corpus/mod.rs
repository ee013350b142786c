//! Corpus loading and filtering.
//!
//! Reads a `{"messages": [...]}` export, narrows it to one sender if asked,
//! and restricts the normalized stream to a local date window.

use crate::error::StatError;
use crate::models::{Corpus, Message};
use crate::time::LocalizedMessage;
use chrono::NaiveDate;
use std::io::Read;
use tracing::debug;

/// Parse an export document from a reader.
pub fn load_corpus<R: Read>(reader: R) -> Result<Vec<Message>, StatError> {
    let corpus: Corpus = serde_json::from_reader(reader)?;
    debug!("Parsed {} messages", corpus.messages.len());
    Ok(corpus.messages)
}

/// Keep only messages sent by `user`. An empty name keeps everything.
///
/// Matching is exact and case-sensitive.
pub fn filter_by_user(messages: Vec<Message>, user: &str) -> Vec<Message> {
    if user.is_empty() {
        return messages;
    }

    messages
        .into_iter()
        .filter(|msg| msg.sender() == user)
        .collect()
}

/// Local calendar window applied after normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    /// Inclusive lower bound.
    pub after: Option<NaiveDate>,
    /// Exclusive upper bound.
    pub before: Option<NaiveDate>,
}

impl DateWindow {
    pub fn is_unbounded(&self) -> bool {
        self.after.is_none() && self.before.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.after.map_or(true, |after| date >= after)
            && self.before.map_or(true, |before| date < before)
    }

    /// Drop messages whose local date falls outside the window.
    pub fn apply(&self, messages: Vec<LocalizedMessage>) -> Vec<LocalizedMessage> {
        if self.is_unbounded() {
            return messages;
        }

        let before = messages.len();
        let kept: Vec<LocalizedMessage> = messages
            .into_iter()
            .filter(|msg| self.contains(msg.moment.date()))
            .collect();
        debug!(
            "Date window kept {} of {} messages",
            kept.len(),
            before
        );
        kept
    }
}
