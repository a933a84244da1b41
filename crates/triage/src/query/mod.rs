//! Query API for UI consumption
//!
//! Provides functions that shape grouped threads for display.

mod threads;

pub use threads::{
    ThreadBuckets, ThreadSummary, mark_read, partition_threads, thread_subject, thread_summary,
};
