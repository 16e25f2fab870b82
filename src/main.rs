//! files - Fast Concurrent File Lister
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use files::config::{CliArgs, WalkConfig};
use files::display::{to_slash, write_path};
use files::progress::{print_summary, ProgressReporter};
use files::{ConcurrentWalker, WalkerError};
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Overflow is an expected stop; exit non-zero without a diagnostic
            if e.downcast_ref::<WalkerError>().is_some_and(WalkerError::is_overflow) {
                debug!("{:#}", e);
                return ExitCode::FAILURE;
            }
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config
    let config = WalkConfig::from_args(args).context("Invalid configuration")?;
    let show_progress = config.show_progress;
    let show_stats = config.show_stats;

    let walker = ConcurrentWalker::new(config).with_global_rules();
    let root = to_slash(&walker.config().root);

    // Setup signal handler for graceful shutdown
    let shutdown_flag = walker.shutdown_flag();
    ctrlc::set_handler(move || {
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    let handle = walker.spawn()?;

    let progress = show_progress.then(ProgressReporter::new);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut printed = 0u64;
    for path in handle.paths() {
        if let Err(e) = write_path(&mut out, &path) {
            // Broken pipe: stop quietly, the reader is gone
            if e.kind() == io::ErrorKind::BrokenPipe {
                break;
            }
            return Err(e).context("Failed to write output");
        }
        printed += 1;
        if let Some(ref p) = progress {
            p.update(printed);
        }
    }
    // A closed stdout (e.g. piped into head) is not worth reporting
    let _ = out.flush();

    if let Some(ref p) = progress {
        p.finish_and_clear();
    }

    let stats = match handle.finish() {
        Ok(stats) => stats,
        Err(WalkerError::ChannelClosed) => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    if show_stats {
        print_summary(&root, &stats);
    }

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("files=debug,warn")
    } else {
        EnvFilter::new("files=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
