//! Thread model representing a conversation assembled from one batch

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::{Message, MessageDate};

/// Subject shown for threads whose normalized subject is empty
pub const NO_SUBJECT: &str = "No Subject";

/// Deterministic thread identifier.
///
/// Derived from a normalized subject and the participant set, rendered as
/// `"{subject}:{addr1},{addr2},..."` with addresses sorted and de-duplicated.
/// Two unlinked threads with the same subject and participants share an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThreadId(pub String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build the id from an already-normalized subject and raw participant addresses
    pub fn derive<'a>(normalized_subject: &str, participants: impl IntoIterator<Item = &'a str>) -> Self {
        let sorted: BTreeSet<String> = participants
            .into_iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        let joined = sorted.into_iter().collect::<Vec<_>>().join(",");
        Self(format!("{}:{}", normalized_subject, joined))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ThreadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A conversation: one or more messages, oldest first.
///
/// Threads only live for one grouping call; `latest_date`, `has_unread`
/// and `message_count` are always derived from `messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: ThreadId,
    /// Normalized subject of the earliest message
    pub subject: String,
    /// Members ordered by date ascending
    pub messages: Vec<Message>,
    /// Date of the newest member
    pub latest_date: MessageDate,
    /// Whether any member is unread
    pub has_unread: bool,
    pub message_count: usize,
}

impl Thread {
    /// Create a thread from members already sorted oldest first
    pub fn new(id: ThreadId, subject: String, messages: Vec<Message>) -> Self {
        let subject = if subject.is_empty() {
            NO_SUBJECT.to_string()
        } else {
            subject
        };
        let mut thread = Self {
            id,
            subject,
            messages,
            latest_date: MessageDate::fallback(),
            has_unread: false,
            message_count: 0,
        };
        thread.refresh();
        thread
    }

    /// Recompute the derived fields after members changed
    pub fn refresh(&mut self) {
        self.latest_date = self
            .messages
            .iter()
            .map(|m| m.date)
            .max()
            .unwrap_or_default();
        self.has_unread = self.messages.iter().any(|m| !m.read);
        self.message_count = self.messages.len();
    }

    /// The newest message, if the thread is non-empty
    pub fn latest(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The oldest message, if the thread is non-empty
    pub fn earliest(&self) -> Option<&Message> {
        self.messages.first()
    }
}
