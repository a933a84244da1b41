//! Conversation threading
//!
//! Partitions a flat batch of messages into disjoint threads.
//!
//! ## Linkage
//!
//! Two messages belong together when, in priority order:
//!
//! 1. **In-Reply-To**: one replies to the other's Message-ID
//! 2. **References**: one lists the other's Message-ID as an ancestor
//! 3. **Shared reference**: both list a common ancestor
//! 4. **Subject fallback**: same non-empty normalized subject and at least
//!    one shared address across From/To/Cc
//!
//! Threads are the connected components of that relation. The subject
//! fallback can merge strangers who write to a shared alias with the same
//! subject; that behavior is intentional and covered by tests.
//!
//! ## Module Structure
//!
//! - `subject`: subject normalization
//! - `linkage`: the pairwise predicate
//! - `components`: union-find
//! - `grouper`: batch grouping entry point

mod components;
mod grouper;
mod linkage;
mod subject;

pub use components::DisjointSet;
pub use grouper::{LinkStats, group_into_threads, group_with_stats};
pub use linkage::{LinkReason, link_reason, participants_overlap};
pub use subject::normalize_subject;
