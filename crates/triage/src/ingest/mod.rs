//! Ingestion pipeline for fetched batches
//!
//! Runs the classifier over every message and then groups the batch into
//! threads. Safe to call concurrently on independent batches.

mod batch;

pub use batch::{IngestOutcome, IngestStats, ingest_batch};
