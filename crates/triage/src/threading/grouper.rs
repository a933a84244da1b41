//! Group a batch of messages into conversation threads
//!
//! ## Algorithm
//!
//! 1. Sort the batch by date ascending (stable, so ties keep input order)
//! 2. Build an undirected linkage graph over the sorted positions:
//!    - Message-ID index for In-Reply-To and References links
//!    - Reference index for messages sharing an ancestor
//!    - Normalized-subject buckets, linked through shared participants
//! 3. Extract connected components with union-find
//! 4. Turn each component into a [`Thread`], seeded by its earliest message
//! 5. Order threads by their newest message, newest first
//!
//! The edges are exactly the pairs for which [`link_reason`] returns a
//! reason, so threads are the transitive closure of that predicate.
//!
//! [`link_reason`]: super::link_reason

use log::debug;
use std::collections::HashMap;

use super::components::DisjointSet;
use super::linkage::participant_key;
use super::normalize_subject;
use crate::models::{Message, Thread, ThreadId};

/// Edge counts per linkage source, for diagnostics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkStats {
    /// Unions made through In-Reply-To or References pointing at a Message-ID
    pub header_links: usize,
    /// Unions made through a shared References entry
    pub shared_reference_links: usize,
    /// Unions made through the subject + participant fallback
    pub subject_links: usize,
}

/// Group messages into threads.
///
/// Every input message ends up in exactly one thread, with `thread_id`
/// stamped. Threads are returned newest first. Empty input gives an empty
/// result; missing headers fall back to subject matching.
pub fn group_into_threads(messages: Vec<Message>) -> Vec<Thread> {
    group_with_stats(messages).0
}

/// Same as [`group_into_threads`], also reporting how links were found
pub fn group_with_stats(mut messages: Vec<Message>) -> (Vec<Thread>, LinkStats) {
    if messages.is_empty() {
        return (Vec::new(), LinkStats::default());
    }

    messages.sort_by_key(|m| m.date);

    let subjects: Vec<String> = messages.iter().map(|m| normalize_subject(&m.subject)).collect();
    let mut graph = DisjointSet::new(messages.len());
    let stats = link_messages(&messages, &subjects, &mut graph);

    let components = graph.components();
    debug!(
        "[THREAD] {} messages -> {} threads ({:?})",
        messages.len(),
        components.len(),
        stats
    );

    // Move messages out by position so each lands in exactly one thread
    let mut slots: Vec<Option<Message>> = messages.into_iter().map(Some).collect();
    let mut threads: Vec<Thread> = components
        .into_iter()
        .map(|members| {
            let seed = members[0];
            let members: Vec<Message> = members
                .into_iter()
                .filter_map(|pos| slots[pos].take())
                .collect();
            build_thread(&subjects[seed], members)
        })
        .collect();

    threads.sort_by(|a, b| b.latest_date.cmp(&a.latest_date));
    (threads, stats)
}

/// Add every linkage edge of the batch to `graph`
fn link_messages(messages: &[Message], subjects: &[String], graph: &mut DisjointSet) -> LinkStats {
    let mut stats = LinkStats::default();

    // Message-ID -> positions carrying it (normally one)
    let mut by_header_id: HashMap<&str, Vec<usize>> = HashMap::new();
    for (pos, msg) in messages.iter().enumerate() {
        if let Some(id) = msg.header_id() {
            by_header_id.entry(id).or_default().push(pos);
        }
    }

    // In-Reply-To and References pointing at a message in the batch
    for (pos, msg) in messages.iter().enumerate() {
        let targets = msg.reply_target().into_iter().chain(msg.reference_ids());
        for target in targets {
            if let Some(parents) = by_header_id.get(target) {
                for &parent in parents {
                    if graph.union(pos, parent) {
                        stats.header_links += 1;
                    }
                }
            }
        }
    }

    // References shared between two messages
    let mut first_with_reference: HashMap<&str, usize> = HashMap::new();
    for (pos, msg) in messages.iter().enumerate() {
        for reference in msg.reference_ids() {
            let first = *first_with_reference.entry(reference).or_insert(pos);
            if graph.union(pos, first) {
                stats.shared_reference_links += 1;
            }
        }
    }

    // Same non-empty subject plus a shared participant
    let mut by_subject: HashMap<&str, Vec<usize>> = HashMap::new();
    for (pos, subject) in subjects.iter().enumerate() {
        if !subject.is_empty() {
            by_subject.entry(subject.as_str()).or_default().push(pos);
        }
    }
    for bucket in by_subject.values().filter(|b| b.len() > 1) {
        let mut first_with_participant: HashMap<String, usize> = HashMap::new();
        for &pos in bucket {
            for participant in messages[pos].participants().map(participant_key) {
                if participant.is_empty() {
                    continue;
                }
                let first = *first_with_participant.entry(participant).or_insert(pos);
                if graph.union(pos, first) {
                    stats.subject_links += 1;
                }
            }
        }
    }

    stats
}

/// Stamp thread ids and assemble the thread record.
///
/// `members` are already in date order; the first one is the seed.
fn build_thread(seed_subject: &str, mut members: Vec<Message>) -> Thread {
    let thread_id = match members.first() {
        Some(seed) => ThreadId::derive(
            seed_subject,
            std::iter::once(seed.from.as_str()).chain(seed.to.iter().map(String::as_str)),
        ),
        None => ThreadId::derive(seed_subject, std::iter::empty()),
    };

    for message in &mut members {
        message.thread_id = Some(thread_id.clone());
    }

    Thread::new(thread_id, seed_subject.to_string(), members)
}
