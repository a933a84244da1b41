//! Text and JSON rendering of triaged threads

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use serde::Serialize;
use std::fmt::Write;

use triage::{Classifier, IngestStats, MessageDate, Thread, ThreadBuckets, ThreadSummary, thread_summary};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    stats: &'a IngestStats,
    needs_response: Vec<JsonThread<'a>>,
    updates: Vec<JsonThread<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonThread<'a> {
    #[serde(flatten)]
    summary: ThreadSummary,
    message_ids: Vec<&'a str>,
}

impl<'a> From<&'a Thread> for JsonThread<'a> {
    fn from(thread: &'a Thread) -> Self {
        Self {
            summary: thread_summary(thread),
            message_ids: thread.messages.iter().map(|m| m.id.as_str()).collect(),
        }
    }
}

pub fn render_json(buckets: &ThreadBuckets, stats: &IngestStats) -> Result<String> {
    let report = JsonReport {
        stats,
        needs_response: buckets.needs_response.iter().map(JsonThread::from).collect(),
        updates: buckets.updates.iter().map(JsonThread::from).collect(),
    };
    serde_json::to_string_pretty(&report).context("Failed to serialize report")
}

/// Two sections, newest thread first. With a classifier, each automated
/// thread also names the rule that flagged its newest message.
pub fn render_text(buckets: &ThreadBuckets, stats: &IngestStats, explain: Option<&Classifier>) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} messages, {} threads",
        stats.messages_in, stats.threads_out
    );

    for (title, threads) in [
        ("Needs response", &buckets.needs_response),
        ("Newsletters & updates", &buckets.updates),
    ] {
        let _ = writeln!(out, "\n{} ({})", title, threads.len());
        for thread in threads {
            let _ = writeln!(out, "{}", format_row(thread, explain));
        }
    }

    out.trim_end().to_string()
}

fn format_row(thread: &Thread, explain: Option<&Classifier>) -> String {
    let summary = thread_summary(thread);
    let marker = if summary.has_unread { "*" } else { " " };
    let sender = summary
        .latest_sender_name
        .as_deref()
        .unwrap_or(&summary.latest_sender);

    let mut row = format!(
        "{} {:>6}  {:<24}  {}",
        marker,
        format_date(&summary.latest_date),
        truncate(sender, 24),
        summary.subject
    );
    if summary.message_count > 1 {
        let _ = write!(row, " ({})", summary.message_count);
    }

    if let Some(classifier) = explain
        && let Some(latest) = thread.latest()
        && let Some(rule) = classifier.explain(&latest.from, &latest.subject, &latest.body)
    {
        let _ = write!(row, "  [{}]", rule.name());
    }

    row
}

fn format_date(date: &MessageDate) -> String {
    if date.is_fallback() {
        return "-".to_string();
    }

    let local = date.instant().with_timezone(&Local);
    let now = Utc::now().with_timezone(&Local);

    if local.date_naive() == now.date_naive() {
        // Today: show time
        local.format("%H:%M").to_string()
    } else if (now - local).num_days() < 7 {
        // This week: show day name
        local.format("%a").to_string()
    } else {
        local.format("%b %d").to_string()
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage::{Message, TriageConfig, ingest_batch, partition_threads};

    fn sample() -> (ThreadBuckets, IngestStats) {
        let messages = vec![
            Message::builder("1")
                .from("Jane <jane@personal.com>")
                .to(["me@home.net"])
                .subject("Can we meet Friday?")
                .body("Let me know your availability.")
                .date_str("2024-03-01T10:00:00Z")
                .build(),
            Message::builder("2")
                .from("updates@service.com")
                .to(["me@home.net"])
                .subject("Weekly Newsletter")
                .body("Top stories... unsubscribe here")
                .date_str("2024-03-02T10:00:00Z")
                .build(),
        ];
        let outcome = ingest_batch(messages, &Classifier::new(), &TriageConfig::default());
        (partition_threads(outcome.threads), outcome.stats)
    }

    #[test]
    fn test_render_text_sections() {
        let (buckets, stats) = sample();
        let text = render_text(&buckets, &stats, None);

        assert!(text.starts_with("2 messages, 2 threads"));
        let needs = text.find("Needs response (1)").unwrap();
        let updates = text.find("Newsletters & updates (1)").unwrap();
        let jane = text.find("Jane").unwrap();
        let news = text.find("weekly newsletter").unwrap();
        assert!(needs < jane && jane < updates && updates < news);
        assert!(!text.contains('['));
    }

    #[test]
    fn test_render_text_explain() {
        let (buckets, stats) = sample();
        let classifier = Classifier::new();
        let text = render_text(&buckets, &stats, Some(&classifier));
        assert!(text.contains("[automated_sender]"));
    }

    #[test]
    fn test_render_json() {
        let (buckets, stats) = sample();
        let json = render_json(&buckets, &stats).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["stats"]["messagesIn"], 2);
        assert_eq!(value["needsResponse"][0]["latestSenderName"], "Jane");
        assert_eq!(value["updates"][0]["messageIds"][0], "2");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_fallback_date() {
        assert_eq!(format_date(&MessageDate::fallback()), "-");
    }
}
