//! Rule definitions for the automated-mail classifier

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::markers;

/// Which part of the message a rule inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleTarget {
    Sender,
    Subject,
    Body,
}

/// Errors raised while building rules from user configuration
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Rule name must not be empty")]
    EmptyName,
    #[error("Invalid pattern for rule '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// Lower-cased view of the classifier inputs
#[derive(Debug, Clone)]
pub struct RuleInput {
    pub sender: String,
    pub subject: String,
    pub body: String,
}

impl RuleInput {
    pub fn new(sender: &str, subject: &str, body: &str) -> Self {
        Self {
            sender: sender.to_lowercase(),
            subject: subject.to_lowercase(),
            body: body.to_lowercase(),
        }
    }

    fn field(&self, target: RuleTarget) -> &str {
        match target {
            RuleTarget::Sender => &self.sender,
            RuleTarget::Subject => &self.subject,
            RuleTarget::Body => &self.body,
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    /// Any of the (lower-case) needles is a substring
    Contains(Vec<String>),
    Pattern(Regex),
}

/// One predicate of the classifier: if it matches, the message is automated
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    target: RuleTarget,
    matcher: Matcher,
}

impl Rule {
    /// Substring rule; needles are lower-cased and blanks dropped
    pub fn contains<I, S>(name: impl Into<String>, target: RuleTarget, needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let needles = needles
            .into_iter()
            .map(|n| n.as_ref().trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        Self {
            name: name.into(),
            target,
            matcher: Matcher::Contains(needles),
        }
    }

    /// Regex rule, matched case-insensitively
    pub fn pattern(name: impl Into<String>, target: RuleTarget, pattern: &str) -> Result<Self, RuleError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RuleError::EmptyName);
        }
        let regex = Regex::new(&format!("(?i){}", pattern)).map_err(|source| {
            RuleError::InvalidPattern {
                name: name.clone(),
                source,
            }
        })?;
        Ok(Self {
            name,
            target,
            matcher: Matcher::Pattern(regex),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> RuleTarget {
        self.target
    }

    pub fn matches(&self, input: &RuleInput) -> bool {
        let haystack = input.field(self.target);
        match &self.matcher {
            Matcher::Contains(needles) => needles.iter().any(|n| haystack.contains(n.as_str())),
            Matcher::Pattern(regex) => regex.is_match(haystack),
        }
    }

    /// Append more needles to a substring rule; ignored for pattern rules
    fn extend<I, S>(&mut self, extra: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Matcher::Contains(needles) = &mut self.matcher {
            needles.extend(
                extra
                    .into_iter()
                    .map(|n| n.as_ref().trim().to_lowercase())
                    .filter(|n| !n.is_empty()),
            );
        }
    }
}

/// Names of the built-in rules, in evaluation order
pub mod names {
    pub const AUTOMATED_SENDER: &str = "automated_sender";
    pub const UNSUBSCRIBE_PHRASE: &str = "unsubscribe_phrase";
    pub const BULK_SUBJECT: &str = "bulk_subject";
    pub const UNSUBSCRIBE_LINK: &str = "unsubscribe_link";
    pub const AUTOMATED_PLATFORM: &str = "automated_platform";
}

/// A user-defined regex rule from configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomRule {
    pub name: String,
    pub target: RuleTarget,
    pub pattern: String,
}

/// User additions to the built-in rule set.
///
/// Extra markers are appended to the matching built-in rule; custom rules
/// are evaluated after all built-in rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleOverrides {
    pub sender_markers: Vec<String>,
    pub body_phrases: Vec<String>,
    pub subject_markers: Vec<String>,
    pub platform_markers: Vec<String>,
    pub custom: Vec<CustomRule>,
}

impl RuleOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The built-in rules in priority order
pub fn default_rules() -> Vec<Rule> {
    let link = Rule::pattern(
        names::UNSUBSCRIBE_LINK,
        RuleTarget::Body,
        markers::UNSUBSCRIBE_LINK_PATTERN,
    )
    .expect("Invalid unsubscribe link regex");

    vec![
        Rule::contains(names::AUTOMATED_SENDER, RuleTarget::Sender, markers::AUTOMATED_SENDERS),
        Rule::contains(names::UNSUBSCRIBE_PHRASE, RuleTarget::Body, markers::UNSUBSCRIBE_PHRASES),
        Rule::contains(names::BULK_SUBJECT, RuleTarget::Subject, markers::BULK_SUBJECT_MARKERS),
        link,
        Rule::contains(
            names::AUTOMATED_PLATFORM,
            RuleTarget::Body,
            markers::AUTOMATED_PLATFORM_MARKERS,
        ),
    ]
}

/// Built-in rules with user overrides applied
pub fn rules_with_overrides(overrides: &RuleOverrides) -> Result<Vec<Rule>, RuleError> {
    let mut rules = default_rules();

    for rule in &mut rules {
        let name = rule.name.clone();
        match name.as_str() {
            names::AUTOMATED_SENDER => rule.extend(&overrides.sender_markers),
            names::UNSUBSCRIBE_PHRASE => rule.extend(&overrides.body_phrases),
            names::BULK_SUBJECT => rule.extend(&overrides.subject_markers),
            names::AUTOMATED_PLATFORM => rule.extend(&overrides.platform_markers),
            _ => {}
        }
    }

    for custom in &overrides.custom {
        rules.push(Rule::pattern(&custom.name, custom.target, &custom.pattern)?);
    }

    Ok(rules)
}
