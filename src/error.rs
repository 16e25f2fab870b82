//! Error types for files
//!
//! This module defines the error hierarchy for a walk:
//! - Directory listing and stat failures (terminal for the walk)
//! - The overflow sentinel raised when the emit counter passes its maximum
//! - Root precondition failures, reported before any traversal starts
//! - Configuration and worker thread errors
//!
//! Rule file parse failures have their own type, [`RuleFileError`], because
//! they never escape the directory that produced them.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for a walk
#[derive(Error, Debug)]
pub enum WalkerError {
    /// Directory could not be listed
    #[error("Failed to read directory '{}': {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Entry type could not be determined while listing
    #[error("Failed to stat '{}': {source}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// More files were found than the configured maximum
    #[error("Overflow max count ({max})")]
    Overflow { max: u64 },

    /// Walk root exists but is not a directory
    #[error("'{}' is not a directory", path.display())]
    RootNotDirectory { path: PathBuf },

    /// Walk root could not be read at all
    #[error("Cannot access '{}': {source}", path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// Interrupted by signal
    #[error("Operation interrupted by signal")]
    Interrupted,

    /// Consumer dropped the result stream before the walk finished
    #[error("Result stream closed by consumer")]
    ChannelClosed,
}

impl WalkerError {
    /// True for the overflow sentinel, which callers usually report silently
    pub fn is_overflow(&self) -> bool {
        matches!(self, WalkerError::Overflow { .. })
    }

    /// Ranking used when several branches fail: higher wins
    pub(crate) fn precedence(&self) -> u8 {
        match self {
            WalkerError::Overflow { .. } => 3,
            WalkerError::Interrupted => 2,
            WalkerError::ChannelClosed => 0,
            _ => 1,
        }
    }
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Static ignore pattern did not compile
    #[error("Invalid ignore pattern '{pattern}': {reason}")]
    InvalidIgnorePattern { pattern: String, reason: String },

    /// Match filter did not compile
    #[error("Invalid match pattern '{pattern}': {reason}")]
    InvalidMatchPattern { pattern: String, reason: String },

    /// Admission pool capacity out of range
    #[error("Invalid concurrency {count}: must be between 1 and {max}")]
    InvalidConcurrency { count: usize, max: usize },

    /// Result stream capacity too small
    #[error("Invalid buffer size {size}: must be at least {min}")]
    InvalidBufferSize { size: usize, min: usize },

    /// Root path could not be resolved for display
    #[error("Invalid root path '{}': {reason}", path.display())]
    InvalidRoot { path: PathBuf, reason: String },
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Traversal thread panicked
    #[error("Walker thread for '{}' panicked: {message}", path.display())]
    Panicked { path: PathBuf, message: String },

    /// Traversal thread could not be started
    #[error("Failed to spawn walker thread for '{}': {reason}", path.display())]
    SpawnFailed { path: PathBuf, reason: String },
}

/// A rule file could not be turned into a matcher
///
/// Always absorbed locally: the directory simply contributes no extra rules.
#[derive(Error, Debug)]
pub enum RuleFileError {
    /// No rule file at the given location
    #[error("Rule file not found: '{}'", path.display())]
    NotFound { path: PathBuf },

    /// Rule file exists but could not be read or parsed
    #[error("Failed to parse rule file '{}': {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
}

/// Result type alias for WalkerError
pub type Result<T> = std::result::Result<T, WalkerError>;

/// Pick the error a parent reports after its children have joined
///
/// Keeps the first error observed unless a later one ranks higher.
pub(crate) fn merge_error(current: &mut Option<WalkerError>, next: WalkerError) {
    match current {
        Some(existing) if existing.precedence() >= next.precedence() => {}
        _ => *current = Some(next),
    }
}
