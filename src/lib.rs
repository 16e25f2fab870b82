//! files - Fast Concurrent File Lister
//!
//! Enumerates every file beneath a directory and streams the paths to the
//! caller while the walk is still running.
//!
//! # Features
//!
//! - **Bounded Parallelism**: Subtrees run on their own thread while an
//!   admission token is free, and inline otherwise, so thread count never
//!   exceeds the configured limit however large the tree.
//!
//! - **Layered Ignore Rules**: A static name pattern prunes VCS directories;
//!   optional `.gitignore` files apply to their own subtree only, plus the
//!   user's global git excludes file.
//!
//! - **Streaming Output**: Paths flow through a small bounded channel, so a
//!   slow consumer applies backpressure to the whole walk.
//!
//! - **Hard Limit**: An atomic emit counter stops the walk with a
//!   distinguishable overflow error once a maximum is passed.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   WalkConfig   ┌─────────────────────────────────┐
//! │  CLI / lib   │ ─────────────► │        ConcurrentWalker          │
//! │   caller     │                │  coordinator ─► walk(root)       │
//! └──────▲───────┘                │      │ EntryClassifier           │
//!        │                        │      │ IgnoreRuleSet (by value)  │
//!        │ paths()                │      ▼                           │
//!        │                        │  AdmissionPool: thread | inline  │
//!        │                        └──────┬──────────────────────────┘
//!        │                               │ push
//!        │        ┌──────────────────────▼───┐
//!        └─────── │ ResultStream (bounded)   │
//!                 │ EmitCounter (atomic)     │
//!                 └──────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use files::{ConcurrentWalker, WalkConfig};
//!
//! let walker = ConcurrentWalker::new(WalkConfig::new(".").with_gitignore(true));
//! let handle = walker.with_global_rules().spawn()?;
//! for path in handle.paths() {
//!     println!("{}", path.display());
//! }
//! let stats = handle.finish()?;
//! eprintln!("{} files", stats.files);
//! # Ok::<(), files::WalkerError>(())
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod progress;
pub mod rules;
pub mod walker;

pub use config::{CliArgs, MaxResults, WalkConfig};
pub use error::{ConfigError, Result, RuleFileError, WalkerError, WorkerError};
pub use rules::{IgnoreMatcher, IgnoreRuleSet, RuleFileLoader, StaticNamePattern};
pub use walker::{ConcurrentWalker, Entry, EntryClassifier, Verdict, WalkHandle, WalkStats};
