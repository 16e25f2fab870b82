//! Progress reporting for the file lister
//!
//! Draws on stderr so stdout carries nothing but paths.

use crate::walker::WalkStats;
use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Refresh the counter every this many files
const UPDATE_EVERY: u64 = 10;

/// Progress reporter that displays the running file count
pub struct ProgressReporter {
    /// Progress bar
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("Invalid progress template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Record that `count` files have been printed
    pub fn update(&self, count: u64) {
        if count % UPDATE_EVERY == 0 {
            self.bar.set_message(format!("Files: {}", format_number(count)));
        }
    }

    /// Finish and clear the progress display
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Print a summary of the walk on stderr
pub fn print_summary(root: &str, stats: &WalkStats) {
    eprintln!();
    eprintln!("{}", style("Walk Complete").green().bold());
    eprintln!("{}", style("─".repeat(50)).dim());
    eprintln!("  {} {}", style("Root:").bold(), root);
    eprintln!("  {} {}", style("Files:").bold(), format_number(stats.files));
    eprintln!("  {} {}", style("Directories:").bold(), format_number(stats.dirs));
    eprintln!(
        "  {} {} dirs, {} files",
        style("Ignored:").bold(),
        format_number(stats.pruned),
        format_number(stats.skipped)
    );
    eprintln!(
        "  {} {} threaded, {} inline",
        style("Subtrees:").bold(),
        format_number(stats.spawned),
        format_number(stats.inline)
    );
    eprintln!(
        "  {} {:.2}s ({:.0} files/sec)",
        style("Duration:").bold(),
        stats.duration.as_secs_f64(),
        stats.files_per_second()
    );
    eprintln!();
}
