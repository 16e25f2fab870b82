//! Configuration types for files
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation
//! - The maximum-results setting

use crate::display::resolve_root;
use crate::error::ConfigError;
use crate::rules::{home_dir, StaticNamePattern, DEFAULT_IGNORE_PATTERN};
use crate::walker::{DEFAULT_CONCURRENCY, DEFAULT_STREAM_CAPACITY};
use clap::Parser;
use regex::Regex;
use std::path::PathBuf;

/// Maximum reasonable admission pool size
const MAX_CONCURRENCY: usize = 512;

/// Minimum result stream capacity
const MIN_STREAM_CAPACITY: usize = 1;

/// Per-directory rule file name
pub const RULE_FILE_NAME: &str = ".gitignore";

/// List files beneath a directory, fast
#[derive(Parser, Debug, Clone)]
#[command(
    name = "files",
    version,
    about = "List files beneath a directory, fast",
    long_about = "Walks a directory tree concurrently and prints every file as soon as it is found.\n\n\
                  Directories whose names match the ignore pattern are skipped entirely.\n\
                  With -g, .gitignore files and the global git excludes file are honoured.",
    after_help = "EXAMPLES:\n    \
        files\n    \
        files ~/src -g\n    \
        files -a -m '\\.rs$' .\n    \
        files -M 1000 /var/log\n    \
        FILES_IGNORE_PATTERN='^(\\.git|node_modules)$' files"
)]
pub struct CliArgs {
    /// Directory to list (slash-separated paths and a leading ~ are accepted)
    #[arg(value_name = "ROOT", default_value = ".")]
    pub root: String,

    /// Regex of entry names to ignore (directories are pruned)
    #[arg(
        short = 'i',
        long = "ignore",
        env = "FILES_IGNORE_PATTERN",
        default_value = DEFAULT_IGNORE_PATTERN,
        value_name = "REGEX"
    )]
    pub ignore: String,

    /// Only print files whose path matches this regex
    #[arg(short = 'm', long = "match", value_name = "REGEX")]
    pub match_pattern: Option<String>,

    /// Stop with an error after this many files (<= 0 means no limit)
    #[arg(
        short = 'M',
        long = "max-files",
        default_value_t = -1,
        allow_negative_numbers = true,
        value_name = "NUM"
    )]
    pub max_files: i64,

    /// Honour .gitignore files and the global git excludes file
    #[arg(short = 'g', long = "gitignore")]
    pub gitignore: bool,

    /// With -g, skip the global git excludes file
    #[arg(long)]
    pub no_global_ignore: bool,

    /// Print absolute paths
    #[arg(short = 'a', long)]
    pub absolute: bool,

    /// Show a progress counter on stderr
    #[arg(short = 'p', long)]
    pub progress: bool,

    /// Maximum number of directories walked in parallel
    #[arg(
        short = 'j',
        long,
        default_value_t = DEFAULT_CONCURRENCY,
        value_name = "NUM"
    )]
    pub concurrency: usize,

    /// Result buffer between the walker and the printer
    #[arg(long = "buffer", default_value_t = DEFAULT_STREAM_CAPACITY, value_name = "NUM")]
    pub buffer: usize,

    /// Verbose output (debug logging on stderr)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Print a walk summary on stderr when done
    #[arg(long)]
    pub stats: bool,
}

/// Upper bound on emitted files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxResults {
    /// No limit
    #[default]
    Unbounded,

    /// Overflow once more than this many files are found
    Limit(u64),
}

impl MaxResults {
    /// Interpret the CLI value: anything <= 0 means no limit
    pub fn from_flag(value: i64) -> Self {
        if value > 0 {
            MaxResults::Limit(value as u64)
        } else {
            MaxResults::Unbounded
        }
    }

    pub fn limit(self) -> Option<u64> {
        match self {
            MaxResults::Limit(max) => Some(max),
            MaxResults::Unbounded => None,
        }
    }
}

/// Validated runtime configuration, read-only for the lifetime of a walk
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// Directory the walk starts from
    pub root: PathBuf,

    /// Regex matched against bare entry names
    pub static_ignore: StaticNamePattern,

    /// Optional filter on emitted (slash-normalised) paths
    pub match_pattern: Option<Regex>,

    /// Compile a rule file in every visited directory
    pub use_scoped_ignore_files: bool,

    /// Seed the root with the global git excludes file
    pub use_global_ignore_file: bool,

    /// Name of the per-directory rule file
    pub rule_file_name: String,

    /// Maximum number of emitted files
    pub max_results: MaxResults,

    /// Admission pool capacity
    pub concurrency: usize,

    /// Result stream capacity
    pub stream_capacity: usize,

    /// Show progress indicator
    pub show_progress: bool,

    /// Print a summary when done
    pub show_stats: bool,
}

impl WalkConfig {
    /// Library defaults for walking `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            static_ignore: StaticNamePattern::default(),
            match_pattern: None,
            use_scoped_ignore_files: false,
            use_global_ignore_file: false,
            rule_file_name: RULE_FILE_NAME.to_string(),
            max_results: MaxResults::Unbounded,
            concurrency: DEFAULT_CONCURRENCY,
            stream_capacity: DEFAULT_STREAM_CAPACITY,
            show_progress: false,
            show_stats: false,
        }
    }

    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let static_ignore =
            StaticNamePattern::new(&args.ignore).map_err(|e| ConfigError::InvalidIgnorePattern {
                pattern: args.ignore.clone(),
                reason: e.to_string(),
            })?;

        let match_pattern = args
            .match_pattern
            .as_deref()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::InvalidMatchPattern {
                    pattern: p.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        // Validate concurrency
        if args.concurrency == 0 || args.concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::InvalidConcurrency {
                count: args.concurrency,
                max: MAX_CONCURRENCY,
            });
        }

        // Validate buffer size
        if args.buffer < MIN_STREAM_CAPACITY {
            return Err(ConfigError::InvalidBufferSize {
                size: args.buffer,
                min: MIN_STREAM_CAPACITY,
            });
        }

        let root = resolve_root(&args.root, home_dir().as_deref(), args.absolute)?;

        Ok(Self {
            root,
            static_ignore,
            match_pattern,
            use_scoped_ignore_files: args.gitignore,
            use_global_ignore_file: args.gitignore && !args.no_global_ignore,
            rule_file_name: RULE_FILE_NAME.to_string(),
            max_results: MaxResults::from_flag(args.max_files),
            concurrency: args.concurrency,
            stream_capacity: args.buffer,
            show_progress: args.progress,
            show_stats: args.stats,
        })
    }

    /// Enable scoped rule files and the global ignore file together
    pub fn with_gitignore(mut self, enabled: bool) -> Self {
        self.use_scoped_ignore_files = enabled;
        self.use_global_ignore_file = enabled;
        self
    }

    pub fn with_scoped_ignore_files(mut self, enabled: bool) -> Self {
        self.use_scoped_ignore_files = enabled;
        self
    }

    pub fn with_static_ignore(mut self, pattern: StaticNamePattern) -> Self {
        self.static_ignore = pattern;
        self
    }

    pub fn with_match_pattern(mut self, pattern: Option<Regex>) -> Self {
        self.match_pattern = pattern;
        self
    }

    pub fn with_max_results(mut self, max: MaxResults) -> Self {
        self.max_results = max;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_stream_capacity(mut self, capacity: usize) -> Self {
        self.stream_capacity = capacity;
        self
    }
}
