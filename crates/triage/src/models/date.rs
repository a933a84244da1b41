//! Message timestamps with a deterministic fallback for bad input

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Timestamp of a message as reported by the fetch layer.
///
/// Dates that are missing or cannot be parsed become the Unix epoch with
/// the fallback marker set. Fallback dates order before every parsed date,
/// so they are treated as the oldest possible date when sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageDate {
    instant: DateTime<Utc>,
    fallback: bool,
}

impl MessageDate {
    /// A parsed, trusted timestamp
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            fallback: false,
        }
    }

    /// The fallback date used for missing or invalid input
    pub fn fallback() -> Self {
        Self {
            instant: DateTime::UNIX_EPOCH,
            fallback: true,
        }
    }

    /// Parse an RFC 3339, RFC 2822 or epoch-milliseconds string.
    ///
    /// Never fails: anything unparseable yields [`MessageDate::fallback`].
    pub fn parse(s: &str) -> Self {
        match parse_instant(s) {
            Some(instant) => Self::new(instant),
            None => {
                log::warn!("[DATE] Unparseable message date {:?}, using fallback", s);
                Self::fallback()
            }
        }
    }

    /// Build from epoch milliseconds, as some servers report internal dates
    pub fn from_millis(millis: i64) -> Self {
        match Utc.timestamp_millis_opt(millis).single() {
            Some(instant) => Self::new(instant),
            None => Self::fallback(),
        }
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// Whether this date was substituted for missing or invalid input
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    s.parse::<i64>()
        .ok()
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
}

impl Default for MessageDate {
    fn default() -> Self {
        Self::fallback()
    }
}

impl From<DateTime<Utc>> for MessageDate {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::new(instant)
    }
}

impl Ord for MessageDate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Fallback dates sort first, then by instant
        (!self.fallback, self.instant).cmp(&(!other.fallback, other.instant))
    }
}

impl PartialOrd for MessageDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MessageDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fallback {
            write!(f, "unknown date")
        } else {
            write!(f, "{}", self.instant.format("%Y-%m-%d %H:%M"))
        }
    }
}

impl Serialize for MessageDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.fallback {
            serializer.serialize_none()
        } else {
            serializer.serialize_str(&self.instant.to_rfc3339())
        }
    }
}

/// Wire shapes accepted for a date field
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    Millis(i64),
    Missing(Option<()>),
}

impl<'de> Deserialize<'de> for MessageDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawDate::deserialize(deserializer) {
            Ok(RawDate::Text(s)) => MessageDate::parse(&s),
            Ok(RawDate::Millis(millis)) => MessageDate::from_millis(millis),
            Ok(RawDate::Missing(_)) | Err(_) => MessageDate::fallback(),
        })
    }
}
