//! Subject normalization for thread matching
//!
//! Replies and forwards carry the original subject behind one or more
//! `Re:`/`Fwd:` prefixes, and list traffic adds a `[list]` tag. Stripping
//! both lets related messages compare equal.

use regex::Regex;
use std::sync::OnceLock;

static REPLY_PREFIX: OnceLock<Regex> = OnceLock::new();
static LIST_TAG: OnceLock<Regex> = OnceLock::new();

/// Leading `Re:`, `Fwd:` or `Fw:` markers, any case, possibly repeated
fn reply_prefix_regex() -> &'static Regex {
    REPLY_PREFIX.get_or_init(|| {
        Regex::new(r"(?i)^(?:(?:re|fwd|fw):\s*)+").expect("Invalid reply prefix regex")
    })
}

/// A single leading bracketed tag such as `[rust-users]`
fn list_tag_regex() -> &'static Regex {
    LIST_TAG.get_or_init(|| Regex::new(r"^\[[^\]]*\]\s*").expect("Invalid list tag regex"))
}

/// Normalize an email subject for threading comparison.
///
/// Removes leading reply/forward prefixes, then one leading bracketed
/// mailing-list tag, then trims and lower-cases. Interior whitespace is
/// left untouched.
///
/// ```
/// use triage::threading::normalize_subject;
///
/// assert_eq!(normalize_subject("Re: Project X"), "project x");
/// assert_eq!(normalize_subject("FWD: re: [team] Budget"), "budget");
/// assert_eq!(normalize_subject("Re:"), "");
/// ```
pub fn normalize_subject(subject: &str) -> String {
    let subject = subject.trim_start();
    let without_prefix = reply_prefix_regex().replace(subject, "");
    let without_tag = list_tag_regex().replace(&without_prefix, "");
    without_tag.trim().to_lowercase()
}
