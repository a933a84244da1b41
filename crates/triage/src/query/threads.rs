//! Thread query functions

use serde::{Deserialize, Serialize};

use crate::models::{Category, MessageDate, MessageId, NO_SUBJECT, Thread, ThreadId};
use crate::threading::normalize_subject;

/// Summary information for displaying a thread in a list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSummary {
    /// Thread ID
    pub id: ThreadId,
    /// Subject of the earliest message, normalized
    pub subject: String,
    /// Sender address of the newest message
    pub latest_sender: String,
    /// Sender display name of the newest message
    pub latest_sender_name: Option<String>,
    /// Number of messages in the thread
    pub message_count: usize,
    /// Whether the thread has unread messages
    pub has_unread: bool,
    /// Timestamp of the most recent message
    pub latest_date: MessageDate,
}

impl From<&Thread> for ThreadSummary {
    fn from(thread: &Thread) -> Self {
        thread_summary(thread)
    }
}

/// Threads split into the two inbox sections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadBuckets {
    /// Threads whose newest message came from a person
    pub needs_response: Vec<Thread>,
    /// Newsletters, notifications and other automated threads
    pub updates: Vec<Thread>,
}

/// Get the original subject of a thread (without reply prefixes).
///
/// Uses the earliest-dated message, which carries the canonical subject.
pub fn thread_subject(thread: &Thread) -> String {
    let subject = thread
        .messages
        .iter()
        .min_by_key(|m| m.date)
        .map(|m| normalize_subject(&m.subject))
        .unwrap_or_default();

    if subject.is_empty() {
        NO_SUBJECT.to_string()
    } else {
        subject
    }
}

/// Summary info for list display.
///
/// Subject comes from the earliest message, sender from the newest.
pub fn thread_summary(thread: &Thread) -> ThreadSummary {
    let latest = thread.messages.iter().max_by_key(|m| m.date);

    ThreadSummary {
        id: thread.id.clone(),
        subject: thread_subject(thread),
        latest_sender: latest.map(|m| m.from.clone()).unwrap_or_default(),
        latest_sender_name: latest.and_then(|m| m.from_display_name.clone()),
        message_count: thread.message_count,
        has_unread: thread.has_unread,
        latest_date: thread.latest_date,
    }
}

/// Split threads by the category of their newest message.
///
/// Unclassified messages count as human. Relative order is preserved.
pub fn partition_threads(threads: Vec<Thread>) -> ThreadBuckets {
    let (updates, needs_response): (Vec<Thread>, Vec<Thread>) =
        threads.into_iter().partition(|thread| {
            thread
                .latest()
                .is_some_and(|m| m.category == Some(Category::Automated))
        });

    ThreadBuckets {
        needs_response,
        updates,
    }
}

/// Mark one message as read and refresh its thread.
///
/// Returns false if no thread contains the message.
pub fn mark_read(threads: &mut [Thread], message_id: &MessageId) -> bool {
    for thread in threads.iter_mut() {
        if let Some(message) = thread.messages.iter_mut().find(|m| &m.id == message_id) {
            message.read = true;
            thread.refresh();
            return true;
        }
    }
    false
}
