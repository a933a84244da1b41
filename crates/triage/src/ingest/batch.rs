//! Batch ingestion: classify every message, then group into threads

use log::{info, warn};
use serde::Serialize;

use crate::classify::Classifier;
use crate::config::TriageConfig;
use crate::models::{Category, Message, Thread};
use crate::threading::group_with_stats;

/// Statistics from one ingestion pass
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestStats {
    /// Number of messages in the batch
    pub messages_in: usize,
    /// Number of threads produced
    pub threads_out: usize,
    /// Messages classified as human
    pub human: usize,
    /// Messages classified as automated
    pub automated: usize,
    /// Messages whose date was missing or unparseable
    pub fallback_dates: usize,
    /// Whether the batch exceeded the configured size limit
    pub oversized: bool,
    /// Duration of the pass
    pub duration_ms: u64,
}

/// Threads plus statistics for one batch
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    /// Threads, newest first
    pub threads: Vec<Thread>,
    pub stats: IngestStats,
}

/// Process a fetched batch end to end.
///
/// Every message gets a `category` and a `thread_id`. Oversized batches
/// are logged and still processed in full.
pub fn ingest_batch(
    mut messages: Vec<Message>,
    classifier: &Classifier,
    config: &TriageConfig,
) -> IngestOutcome {
    let start = std::time::Instant::now();
    let mut stats = IngestStats {
        messages_in: messages.len(),
        ..Default::default()
    };

    if messages.is_empty() {
        stats.duration_ms = start.elapsed().as_millis() as u64;
        return IngestOutcome {
            threads: Vec::new(),
            stats,
        };
    }

    if messages.len() > config.max_batch_size {
        warn!(
            "[INGEST] Batch of {} messages exceeds max_batch_size {}; subject matching cost grows quadratically",
            messages.len(),
            config.max_batch_size
        );
        stats.oversized = true;
    }

    // 1. Classify
    classifier.classify_batch(&mut messages, config.parallel_threshold);
    for message in &messages {
        match message.category {
            Some(Category::Automated) => stats.automated += 1,
            _ => stats.human += 1,
        }
        if message.date.is_fallback() {
            stats.fallback_dates += 1;
        }
    }

    // 2. Group
    let (threads, links) = group_with_stats(messages);
    stats.threads_out = threads.len();
    stats.duration_ms = start.elapsed().as_millis() as u64;

    info!(
        "[INGEST] {} messages -> {} threads ({} human, {} automated, {} undated) in {}ms; links {:?}",
        stats.messages_in,
        stats.threads_out,
        stats.human,
        stats.automated,
        stats.fallback_dates,
        stats.duration_ms,
        links
    );

    IngestOutcome { threads, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageDate;

    fn make_test_message(id: &str, from: &str, subject: &str, body: &str, date: &str) -> Message {
        Message::builder(id)
            .from(from)
            .to(["me@home.net"])
            .subject(subject)
            .body(body)
            .date(MessageDate::parse(date))
            .build()
    }

    #[test]
    fn test_ingest_empty() {
        let outcome = ingest_batch(Vec::new(), &Classifier::new(), &TriageConfig::default());
        assert!(outcome.threads.is_empty());
        assert_eq!(outcome.stats.messages_in, 0);
        assert_eq!(outcome.stats.threads_out, 0);
    }

    #[test]
    fn test_ingest_stamps_every_message() {
        let messages = vec![
            make_test_message("1", "jane@personal.com", "Lunch", "Friday?", "2024-02-01T12:00:00Z"),
            make_test_message("2", "noreply@shop.com", "Your receipt", "Thanks", "2024-02-02T12:00:00Z"),
            make_test_message("3", "me@home.net", "Re: Lunch", "Sure", "not a date"),
        ];

        let outcome = ingest_batch(messages, &Classifier::new(), &TriageConfig::default());

        assert_eq!(outcome.stats.messages_in, 3);
        assert_eq!(outcome.stats.threads_out, 2);
        assert_eq!(outcome.stats.human, 2);
        assert_eq!(outcome.stats.automated, 1);
        assert_eq!(outcome.stats.fallback_dates, 1);
        assert!(!outcome.stats.oversized);

        for thread in &outcome.threads {
            for message in &thread.messages {
                assert!(message.category.is_some());
                assert_eq!(message.thread_id.as_ref(), Some(&thread.id));
            }
        }
    }

    #[test]
    fn test_ingest_oversized_batch_still_processed() {
        let config = TriageConfig {
            max_batch_size: 2,
            parallel_threshold: 1,
            ..Default::default()
        };
        let messages: Vec<Message> = (0..5)
            .map(|i| {
                make_test_message(
                    &i.to_string(),
                    &format!("p{}@x.com", i),
                    &format!("Topic {}", i),
                    "",
                    "2024-02-01T12:00:00Z",
                )
            })
            .collect();

        let outcome = ingest_batch(messages, &Classifier::new(), &config);

        assert!(outcome.stats.oversized);
        // All share me@home.net but subjects differ, so nothing merges
        assert_eq!(outcome.stats.threads_out, 5);
    }
}
