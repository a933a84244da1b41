//! Triage crate - Threading and classification for webmail batches
//!
//! This crate provides the platform-independent core of the Sift mail
//! client:
//! - Domain models (Message, Thread, MessageDate)
//! - Thread grouping by header linkage with a subject fallback
//! - Human vs automated classification with an ordered rule list
//! - Ingestion pipeline combining both
//! - Query API for UI consumption
//!
//! Fetching, MIME parsing and rendering live outside this crate; it only
//! consumes already-parsed message records and never performs I/O apart
//! from loading its own config file.

pub mod classify;
pub mod config;
pub mod ingest;
pub mod models;
pub mod query;
pub mod threading;

pub use classify::{Classifier, Rule, RuleError, RuleOverrides, classify};
pub use config::TriageConfig;
pub use ingest::{IngestOutcome, IngestStats, ingest_batch};
pub use models::{Category, EmailAddress, Message, MessageDate, MessageId, Thread, ThreadId};
pub use query::{
    ThreadBuckets, ThreadSummary, mark_read, partition_threads, thread_subject, thread_summary,
};
pub use threading::{LinkReason, group_into_threads, link_reason, normalize_subject};
