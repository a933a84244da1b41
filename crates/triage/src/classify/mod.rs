//! Human vs automated message classification
//!
//! An ordered list of rules is evaluated against the sender, subject and
//! body. The first rule that matches marks the message as automated;
//! when none match the message is treated as human mail. This is a
//! heuristic, so false positives and negatives are expected.
//!
//! Built-in rules, in priority order:
//!
//! 1. `automated_sender`: role local parts such as `noreply@`, `alerts@`
//! 2. `unsubscribe_phrase`: opt-out wording in the body
//! 3. `bulk_subject`: newsletter and transactional subjects
//! 4. `unsubscribe_link`: links to subscription management pages
//! 5. `automated_platform`: automation disclaimers and ESP names

mod markers;
mod rules;

use log::debug;
use rayon::prelude::*;
use std::sync::OnceLock;

use crate::models::{Category, Message};

pub use rules::{
    CustomRule, Rule, RuleError, RuleInput, RuleOverrides, RuleTarget, default_rules, names,
    rules_with_overrides,
};

static DEFAULT_CLASSIFIER: OnceLock<Classifier> = OnceLock::new();

/// Shared classifier with only the built-in rules
pub fn default_classifier() -> &'static Classifier {
    DEFAULT_CLASSIFIER.get_or_init(Classifier::new)
}

/// Classify with the built-in rules.
///
/// Total: any strings, including empty ones, produce a category.
pub fn classify(sender: &str, subject: &str, body: &str) -> Category {
    default_classifier().classify(sender, subject, body)
}

/// Short-circuiting rule list
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    /// Classifier with the built-in rules
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Classifier with an explicit rule list, evaluated in order
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Built-in rules extended by user configuration
    pub fn with_overrides(overrides: &RuleOverrides) -> Result<Self, RuleError> {
        Ok(Self {
            rules: rules_with_overrides(overrides)?,
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The first rule that flags the message as automated, if any
    pub fn explain(&self, sender: &str, subject: &str, body: &str) -> Option<&Rule> {
        let input = RuleInput::new(sender, subject, body);
        self.rules.iter().find(|rule| rule.matches(&input))
    }

    pub fn classify(&self, sender: &str, subject: &str, body: &str) -> Category {
        match self.explain(sender, subject, body) {
            Some(_) => Category::Automated,
            None => Category::Human,
        }
    }

    pub fn classify_message(&self, message: &Message) -> Category {
        self.classify(&message.from, &message.subject, &message.body)
    }

    /// Stamp `category` on every message.
    ///
    /// Batches of at least `parallel_threshold` messages are classified on
    /// the rayon pool; the outcome is the same either way.
    pub fn classify_batch(&self, messages: &mut [Message], parallel_threshold: usize) {
        let parallel = messages.len() >= parallel_threshold.max(1);
        debug!(
            "[CLASSIFY] Classifying {} messages ({})",
            messages.len(),
            if parallel { "parallel" } else { "sequential" }
        );

        if parallel {
            messages
                .par_iter_mut()
                .for_each(|m| m.category = Some(self.classify_message(m)));
        } else {
            for m in messages.iter_mut() {
                m.category = Some(self.classify_message(m));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newsletter_scenario() {
        let category = classify(
            "updates@service.com",
            "Weekly Newsletter",
            "Top stories this week... unsubscribe here if you no longer want these.",
        );
        assert_eq!(category, Category::Automated);
    }

    #[test]
    fn test_personal_scenario() {
        let category = classify(
            "jane@personal.com",
            "Can we meet Friday?",
            "Let me know your availability.",
        );
        assert_eq!(category, Category::Human);
    }

    #[test]
    fn test_sender_rule_wins_without_content_signals() {
        let classifier = Classifier::new();
        let rule = classifier.explain("noreply@example.com", "Hello", "Hi there");

        assert_eq!(rule.map(|r| r.name()), Some(names::AUTOMATED_SENDER));
        assert_eq!(
            classifier.classify("noreply@example.com", "Hello", "Hi there"),
            Category::Automated
        );
    }

    #[test]
    fn test_first_matching_rule_is_reported() {
        let classifier = Classifier::new();
        // Body phrase and subject marker both match; body rule comes first
        let rule = classifier.explain("bob@corp.com", "Monthly digest", "opt out anytime");
        assert_eq!(rule.map(|r| r.name()), Some(names::UNSUBSCRIBE_PHRASE));

        let rule = classifier.explain("bob@corp.com", "Monthly digest", "hello");
        assert_eq!(rule.map(|r| r.name()), Some(names::BULK_SUBJECT));

        let rule = classifier.explain(
            "bob@corp.com",
            "Hello",
            r#"<a href="https://corp.com/email/preferences">here</a>"#,
        );
        assert_eq!(rule.map(|r| r.name()), Some(names::UNSUBSCRIBE_LINK));

        let rule = classifier.explain("bob@corp.com", "Hello", "Sent via SendGrid");
        assert_eq!(rule.map(|r| r.name()), Some(names::AUTOMATED_PLATFORM));
    }

    #[test]
    fn test_empty_inputs_are_human() {
        assert_eq!(classify("", "", ""), Category::Human);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("NO-REPLY@SHOP.COM", "", ""), Category::Automated);
        assert_eq!(classify("a@b.com", "INVOICE #42", ""), Category::Automated);
    }

    #[test]
    fn test_odd_unicode_input() {
        assert_eq!(classify("ÄÖÜ@例え.jp", "\u{0}\u{FFFF}", "İ"), Category::Human);
    }

    #[test]
    fn test_custom_rule_via_overrides() {
        let overrides = RuleOverrides {
            custom: vec![CustomRule {
                name: "jira".into(),
                target: RuleTarget::Sender,
                pattern: r"@[a-z0-9-]+\.atlassian\.net$".into(),
            }],
            ..Default::default()
        };
        let classifier = Classifier::with_overrides(&overrides).unwrap();

        let rule = classifier.explain("jira@acme.atlassian.net", "PROJ-1 updated", "");
        assert_eq!(rule.map(|r| r.name()), Some("jira"));
        assert_eq!(classify("jira@acme.atlassian.net", "PROJ-1 updated", ""), Category::Human);
    }

    #[test]
    fn test_batch_parallel_matches_sequential() {
        let make = || {
            (0..40)
                .map(|i| {
                    let from = if i % 3 == 0 { "alerts@bank.com" } else { "friend@home.net" };
                    Message::builder(format!("{}", i))
                        .from(from)
                        .subject(format!("Note {}", i))
                        .body(if i % 5 == 0 { "unsubscribe" } else { "see you" })
                        .build()
                })
                .collect::<Vec<_>>()
        };
        let classifier = Classifier::new();

        let mut sequential = make();
        classifier.classify_batch(&mut sequential, usize::MAX);
        let mut parallel = make();
        classifier.classify_batch(&mut parallel, 1);

        let seq: Vec<_> = sequential.iter().map(|m| m.category).collect();
        let par: Vec<_> = parallel.iter().map(|m| m.category).collect();
        assert_eq!(seq, par);
        assert!(seq.iter().all(|c| c.is_some()));
        assert_eq!(seq[0], Some(Category::Automated));
        assert_eq!(seq[1], Some(Category::Human));
    }
}
