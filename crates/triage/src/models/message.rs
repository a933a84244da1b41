//! Message model representing one fetched email

use super::{MessageDate, ThreadId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a message within a batch.
///
/// Fetch layers should prefer a persistent server identifier (IMAP UID)
/// over a per-session sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a message needs a human response or is bulk/system mail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Human,
    Automated,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Automated => "automated",
        }
    }
}

/// An email address with optional display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Display name (e.g., "John Doe")
    pub name: Option<String>,
    /// Email address (e.g., "john@example.com")
    pub email: String,
}

impl EmailAddress {
    /// Create a new email address with just the email
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
        }
    }

    /// Create a new email address with a display name
    pub fn with_name(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: email.into(),
        }
    }

    /// Parse an email address from a string like "John Doe <john@example.com>"
    pub fn parse(s: &str) -> Self {
        let s = s.trim();

        if let Some(angle_start) = s.rfind('<')
            && let Some(angle_end) = s.rfind('>')
            && angle_start < angle_end
        {
            let name = s[..angle_start].trim().trim_matches('"').trim();
            let email = s[angle_start + 1..angle_end].trim();
            return Self {
                name: if name.is_empty() {
                    None
                } else {
                    Some(name.to_string())
                },
                email: email.to_string(),
            };
        }

        Self {
            name: None,
            email: s.to_string(),
        }
    }

    /// Parse a comma-separated header value into addresses
    pub fn parse_list(s: &str) -> Vec<Self> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Self::parse)
            .collect()
    }

    /// Format the email address for display
    pub fn display(&self) -> String {
        match &self.name {
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.clone(),
        }
    }
}

/// A single fetched email, as handed over by the fetch layer after MIME parsing.
///
/// `thread_id` and `category` are empty on arrival and are stamped by the
/// grouper and the classifier respectively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Batch-unique identifier
    pub id: MessageId,
    /// Sender address
    pub from: String,
    /// Sender display name, when the From header carried one
    #[serde(default, alias = "fromName", skip_serializing_if = "Option::is_none")]
    pub from_display_name: Option<String>,
    /// Recipients (To field)
    #[serde(default)]
    pub to: Vec<String>,
    /// CC recipients
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub subject: String,
    /// Plain text or raw HTML body
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub date: MessageDate,
    #[serde(default)]
    pub read: bool,
    /// Message-ID header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// In-Reply-To header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<String>,
    /// References header, oldest ancestor first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    /// Assigned by the thread grouper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<ThreadId>,
    /// Assigned by the classifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Message {
    /// Create a new message builder
    pub fn builder(id: impl Into<MessageId>) -> MessageBuilder {
        MessageBuilder::new(id.into())
    }

    /// Every address on the message: sender, then To, then CC
    pub fn participants(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.from.as_str())
            .chain(self.to.iter().map(String::as_str))
            .chain(self.cc.iter().map(String::as_str))
    }

    /// Message-ID, ignoring blank header values
    pub fn header_id(&self) -> Option<&str> {
        non_blank(self.message_id.as_deref())
    }

    /// In-Reply-To, ignoring blank header values
    pub fn reply_target(&self) -> Option<&str> {
        non_blank(self.in_reply_to.as_deref())
    }

    /// References, ignoring blank entries
    pub fn reference_ids(&self) -> impl Iterator<Item = &str> {
        self.references
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
    }

    pub fn is_automated(&self) -> bool {
        self.category == Some(Category::Automated)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Builder for creating Message instances
pub struct MessageBuilder {
    id: MessageId,
    from: Option<EmailAddress>,
    to: Vec<String>,
    cc: Vec<String>,
    subject: String,
    body: String,
    date: MessageDate,
    read: bool,
    message_id: Option<String>,
    in_reply_to: Option<String>,
    references: Vec<String>,
}

impl MessageBuilder {
    fn new(id: MessageId) -> Self {
        Self {
            id,
            from: None,
            to: Vec::new(),
            cc: Vec::new(),
            subject: String::new(),
            body: String::new(),
            date: MessageDate::fallback(),
            read: false,
            message_id: None,
            in_reply_to: None,
            references: Vec::new(),
        }
    }

    /// Sender as a raw header value; a display name is split off if present
    pub fn from(mut self, from: &str) -> Self {
        self.from = Some(EmailAddress::parse(from));
        self
    }

    pub fn from_address(mut self, from: EmailAddress) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to<I, S>(mut self, to: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.to = dedup(to);
        self
    }

    pub fn cc<I, S>(mut self, cc: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cc = dedup(cc);
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn date(mut self, date: impl Into<MessageDate>) -> Self {
        self.date = date.into();
        self
    }

    /// Date as a raw header string; invalid input falls back to the epoch
    pub fn date_str(mut self, date: &str) -> Self {
        self.date = MessageDate::parse(date);
        self
    }

    pub fn read(mut self, read: bool) -> Self {
        self.read = read;
        self
    }

    pub fn message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    pub fn in_reply_to(mut self, in_reply_to: impl Into<String>) -> Self {
        self.in_reply_to = Some(in_reply_to.into());
        self
    }

    pub fn references<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.references = references.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Message {
        let from = self
            .from
            .unwrap_or_else(|| EmailAddress::new("unknown@unknown.com"));
        Message {
            id: self.id,
            from: from.email,
            from_display_name: from.name,
            to: self.to,
            cc: self.cc,
            subject: self.subject,
            body: self.body,
            date: self.date,
            read: self.read,
            message_id: self.message_id,
            in_reply_to: self.in_reply_to,
            references: self.references,
            thread_id: None,
            category: None,
        }
    }
}

/// Keep first occurrence of each address, preserving received order
fn dedup<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let item = item.into();
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
