//! Pairwise linkage between two messages
//!
//! This is the reference definition of "same conversation". The grouper
//! builds the equivalent graph from indexes instead of calling this for
//! every pair, but the two must always agree.

use serde::Serialize;
use std::collections::HashSet;

use super::normalize_subject;
use crate::models::Message;

/// Why two messages were linked, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkReason {
    /// One message's In-Reply-To names the other's Message-ID
    InReplyTo,
    /// One message's References list contains the other's Message-ID
    References,
    /// Both References lists name a common ancestor
    SharedReference,
    /// Same non-empty normalized subject and at least one shared participant
    SubjectAndParticipants,
}

/// Decide whether two messages belong to the same thread.
///
/// Checks are symmetric and evaluated in priority order; the first rule
/// that applies is returned. Missing headers simply skip their rule.
pub fn link_reason(a: &Message, b: &Message) -> Option<LinkReason> {
    if replies_to(a, b) || replies_to(b, a) {
        return Some(LinkReason::InReplyTo);
    }

    if references(a, b) || references(b, a) {
        return Some(LinkReason::References);
    }

    if shares_reference(a, b) {
        return Some(LinkReason::SharedReference);
    }

    let subject = normalize_subject(&a.subject);
    if !subject.is_empty()
        && subject == normalize_subject(&b.subject)
        && participants_overlap(a, b)
    {
        return Some(LinkReason::SubjectAndParticipants);
    }

    None
}

/// `child` was sent in reply to `parent`
fn replies_to(child: &Message, parent: &Message) -> bool {
    matches!((child.reply_target(), parent.header_id()), (Some(target), Some(id)) if target == id)
}

/// `descendant` lists `ancestor` in its References
fn references(descendant: &Message, ancestor: &Message) -> bool {
    ancestor
        .header_id()
        .is_some_and(|id| descendant.reference_ids().any(|r| r == id))
}

fn shares_reference(a: &Message, b: &Message) -> bool {
    let theirs: HashSet<&str> = b.reference_ids().collect();
    !theirs.is_empty() && a.reference_ids().any(|r| theirs.contains(r))
}

/// At least one address appears on both messages (from, to or cc).
///
/// Addresses compare case-insensitively.
pub fn participants_overlap(a: &Message, b: &Message) -> bool {
    let theirs: HashSet<String> = b.participants().map(participant_key).collect();
    a.participants()
        .map(participant_key)
        .any(|p| !p.is_empty() && theirs.contains(&p))
}

/// Comparison key for an address
pub(crate) fn participant_key(address: &str) -> String {
    address.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: &str, from: &str, to: &[&str], subject: &str) -> Message {
        Message::builder(id)
            .from(from)
            .to(to.iter().copied())
            .subject(subject)
            .build()
    }

    #[test]
    fn test_in_reply_to_either_direction() {
        let mut a = msg("1", "a@x.com", &["b@x.com"], "Project X");
        a.message_id = Some("<1@x>".into());
        let mut b = msg("2", "c@y.com", &["d@y.com"], "Something else");
        b.in_reply_to = Some("<1@x>".into());

        assert_eq!(link_reason(&a, &b), Some(LinkReason::InReplyTo));
        assert_eq!(link_reason(&b, &a), Some(LinkReason::InReplyTo));
    }

    #[test]
    fn test_references_contains_message_id() {
        let mut a = msg("1", "a@x.com", &[], "One");
        a.message_id = Some("<1@x>".into());
        let mut b = msg("2", "b@x.com", &[], "Two");
        b.references = vec!["<0@x>".into(), "<1@x>".into()];

        assert_eq!(link_reason(&a, &b), Some(LinkReason::References));
    }

    #[test]
    fn test_shared_reference() {
        let mut a = msg("1", "a@x.com", &[], "One");
        a.references = vec!["<root@x>".into()];
        let mut b = msg("2", "b@x.com", &[], "Two");
        b.references = vec!["<root@x>".into(), "<1@x>".into()];

        assert_eq!(link_reason(&a, &b), Some(LinkReason::SharedReference));
    }

    #[test]
    fn test_header_rules_take_priority_over_subject() {
        let mut a = msg("1", "a@x.com", &["b@x.com"], "Project X");
        a.message_id = Some("<1@x>".into());
        let mut b = msg("2", "b@x.com", &["a@x.com"], "Re: Project X");
        b.in_reply_to = Some("<1@x>".into());

        assert_eq!(link_reason(&a, &b), Some(LinkReason::InReplyTo));
    }

    #[test]
    fn test_subject_fallback_needs_shared_participant() {
        let a = msg("1", "a@x.com", &["b@x.com"], "Lunch");
        let b = msg("2", "B@X.com", &["c@x.com"], "Re: lunch");
        let c = msg("3", "d@y.com", &["e@y.com"], "Lunch");

        assert_eq!(link_reason(&a, &b), Some(LinkReason::SubjectAndParticipants));
        assert_eq!(link_reason(&a, &c), None);
    }

    #[test]
    fn test_cc_counts_as_participant() {
        let a = msg("1", "a@x.com", &[], "Lunch");
        let mut b = msg("2", "z@y.com", &[], "Lunch");
        b.cc = vec!["a@x.com".into()];

        assert_eq!(link_reason(&a, &b), Some(LinkReason::SubjectAndParticipants));
    }

    #[test]
    fn test_empty_subjects_never_link_by_fallback() {
        let a = msg("1", "a@x.com", &["b@x.com"], "");
        let b = msg("2", "a@x.com", &["b@x.com"], "Re:");

        assert_eq!(link_reason(&a, &b), None);
    }

    #[test]
    fn test_missing_message_id_does_not_match_blank_reference() {
        let a = msg("1", "a@x.com", &[], "One");
        let mut b = msg("2", "b@x.com", &[], "Two");
        b.references = vec!["".into()];
        b.in_reply_to = Some("".into());

        assert_eq!(link_reason(&a, &b), None);
    }
}
