//! Concurrent directory walker
//!
//! The walker visits a tree recursively, handing subtrees to scoped threads
//! while admission tokens are free and recursing inline when they are not.
//! Matching files are streamed to the caller as they are found.
//!
//! # Architecture
//!
//! ```text
//!                 ┌──────────────────────────┐
//!                 │   ConcurrentWalker        │
//!                 │  - root checks            │
//!                 │  - coordinator thread     │
//!                 └────────────┬──────────────┘
//!                              │ Entry + IgnoreRuleSet
//!                 ┌────────────▼──────────────┐
//!                 │   EntryClassifier          │
//!                 │  prune / skip / descend /  │
//!                 │  emit                      │
//!                 └─────┬──────────────┬───────┘
//!                descend│              │emit
//!          ┌────────────▼───┐   ┌──────▼─────────────────┐
//!          │ AdmissionPool  │   │ ResultStream           │
//!          │ token → thread │   │ EmitCounter + bounded  │
//!          │ none → inline  │   │ channel → consumer     │
//!          └────────────────┘   └────────────────────────┘
//! ```

pub mod admission;
pub mod classifier;
pub mod concurrent;
pub mod entry;
pub mod stream;

pub use admission::{AdmissionPool, AdmissionStats, AdmissionToken, DEFAULT_CONCURRENCY};
pub use classifier::{EntryClassifier, Verdict};
pub use concurrent::{ConcurrentWalker, WalkHandle, WalkStats};
pub use entry::Entry;
pub use stream::{EmitCounter, ResultStream, DEFAULT_STREAM_CAPACITY};
