//! Concurrent tree walker
//!
//! ```text
//!  caller ──spawn()──► coordinator thread
//!                          │ walk(root, seed rules)
//!                          ▼
//!                 ┌──────────────────┐   token free    ┌──────────────────┐
//!                 │ descend(dir)     │ ──────────────► │ scoped thread    │
//!                 │  list children   │                 │  walk(child)     │
//!                 │  classify each   │ ◄─── join ───── │                  │
//!                 └────────┬─────────┘                 └──────────────────┘
//!                          │ pool exhausted: walk(child) inline
//!                          ▼
//!                  ResultStream (bounded) ──► caller drains WalkHandle::paths()
//! ```
//!
//! Every directory joins all of its child threads before returning, so the
//! coordinator's return means the whole tree is resolved. The coordinator
//! then drops the stream, which closes it for the consumer.

use crossbeam_channel::Receiver;
use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::admission::AdmissionPool;
use super::classifier::{EntryClassifier, Verdict};
use super::entry::Entry;
use super::stream::ResultStream;
use crate::config::WalkConfig;
use crate::display::to_slash;
use crate::error::{merge_error, Result, WalkerError, WorkerError};
use crate::rules::{self, GitignoreLoader, IgnoreRuleSet, RuleFileLoader};

/// Stack for coordinator and walk threads
///
/// Exhausted pools recurse inline, one frame chain per directory level, so a
/// single thread may walk a subtree as deep as the longest path allows.
pub const WALK_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Statistics for a finished walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Files pushed onto the result stream
    pub files: u64,

    /// Directories listed
    pub dirs: u64,

    /// Directories excluded with their subtree
    pub pruned: u64,

    /// Non-directories excluded (rules or match filter)
    pub skipped: u64,

    /// Subtree traversals that ran on their own thread
    pub spawned: u64,

    /// Subtree traversals run inline because the pool was exhausted
    pub inline: u64,

    /// Wall time of the walk
    pub duration: Duration,
}

impl WalkStats {
    pub fn files_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.files as f64 / secs
        } else {
            0.0
        }
    }
}

#[derive(Debug, Default)]
struct WalkCounters {
    dirs: AtomicU64,
    pruned: AtomicU64,
    skipped: AtomicU64,
}

/// Walks a directory tree with bounded parallelism
pub struct ConcurrentWalker {
    config: WalkConfig,
    loader: Arc<dyn RuleFileLoader>,
    seed: IgnoreRuleSet,
    shutdown: Arc<AtomicBool>,
}

impl ConcurrentWalker {
    pub fn new(config: WalkConfig) -> Self {
        Self {
            config,
            loader: Arc::new(GitignoreLoader),
            seed: IgnoreRuleSet::new(),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the rule file compiler
    pub fn with_loader(mut self, loader: Arc<dyn RuleFileLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Rules every entry starts with
    pub fn with_seed_rules(mut self, seed: IgnoreRuleSet) -> Self {
        self.seed = seed;
        self
    }

    /// Seed the root with the user's global ignore file, if enabled and found
    pub fn with_global_rules(self) -> Self {
        if !self.config.use_global_ignore_file {
            return self;
        }
        let home = rules::home_dir();
        self.with_global_rules_from(home.as_deref(), rules::git_excludes_file())
    }

    /// Seed the root with `excludes_file` looked up under `home`, if enabled
    pub fn with_global_rules_from(
        self,
        home: Option<&Path>,
        excludes_file: Option<String>,
    ) -> Self {
        if !self.config.use_global_ignore_file {
            return self;
        }
        let seed = rules::load_global_rules(
            &self.config.root,
            home,
            excludes_file,
            self.loader.as_ref(),
        );
        self.with_seed_rules(seed)
    }

    /// Flag that stops the walk when set (e.g. from a signal handler)
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Check the root and start walking on a coordinator thread
    ///
    /// Root problems are reported here, before any traversal begins.
    pub fn spawn(self) -> Result<WalkHandle> {
        let root = self.config.root.clone();
        let metadata = std::fs::metadata(&root).map_err(|source| WalkerError::RootUnreadable {
            path: root.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(WalkerError::RootNotDirectory { path: root });
        }

        let (stream, receiver) =
            ResultStream::open(self.config.stream_capacity, self.config.max_results);
        let coordinator = thread::Builder::new()
            .name("files-coordinator".to_string())
            .stack_size(WALK_STACK_SIZE)
            .spawn(move || self.coordinate(stream))
            .map_err(|e| WorkerError::SpawnFailed {
                path: root.clone(),
                reason: e.to_string(),
            })?;

        Ok(WalkHandle {
            root,
            paths: receiver,
            coordinator,
        })
    }

    /// Run the walk to completion, collecting every path
    pub fn collect(self) -> (Vec<PathBuf>, Result<WalkStats>) {
        match self.spawn() {
            Ok(handle) => {
                let paths = handle.paths().collect();
                (paths, handle.finish())
            }
            Err(e) => (Vec::new(), Err(e)),
        }
    }

    fn coordinate(self, stream: ResultStream) -> Result<WalkStats> {
        let start = Instant::now();
        info!(root = %self.config.root.display(), "Walk started");

        let state = WalkState {
            classifier: EntryClassifier::new(&self.config, Arc::clone(&self.loader)),
            admission: AdmissionPool::new(self.config.concurrency),
            stream,
            shutdown: &self.shutdown,
            halted: AtomicBool::new(false),
            counters: WalkCounters::default(),
        };

        let result = state.walk(Entry::root(&self.config.root), self.seed.clone());
        let overflowed = state.stream.counter().overflowed();
        let stats = state.stats(start.elapsed());
        // Closes the stream
        drop(state);

        let mut outcome = result.err();
        if self.shutdown.load(Ordering::SeqCst) {
            merge_error(&mut outcome, WalkerError::Interrupted);
        }
        if overflowed {
            if let Some(max) = self.config.max_results.limit() {
                merge_error(&mut outcome, WalkerError::Overflow { max });
            }
        }

        info!(
            files = stats.files,
            dirs = stats.dirs,
            pruned = stats.pruned,
            elapsed_ms = stats.duration.as_millis() as u64,
            "Walk finished"
        );

        match outcome {
            Some(e) => Err(e),
            None => Ok(stats),
        }
    }
}

/// State shared by every traversal branch of one walk
struct WalkState<'a> {
    classifier: EntryClassifier,
    admission: AdmissionPool,
    stream: ResultStream,
    shutdown: &'a AtomicBool,
    halted: AtomicBool,
    counters: WalkCounters,
}

impl WalkState<'_> {
    fn should_stop(&self) -> bool {
        self.halted.load(Ordering::Relaxed) || self.shutdown.load(Ordering::Relaxed)
    }

    fn walk(&self, entry: Entry, inherited: IgnoreRuleSet) -> Result<()> {
        if self.should_stop() {
            return Ok(());
        }

        match self.classifier.classify(&entry, &inherited) {
            Verdict::Prune => {
                debug!(path = %entry.path.display(), "Pruned directory");
                self.counters.pruned.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Verdict::Skip => {
                self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Verdict::Emit => self.emit(entry),
            Verdict::Descend(rules) => {
                if entry.is_listable() {
                    self.descend(&entry.path, rules)
                } else {
                    Ok(())
                }
            }
        }
    }

    fn emit(&self, entry: Entry) -> Result<()> {
        if !self.classifier.wants(&to_slash(&entry.path)) {
            self.counters.skipped.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }

        self.stream.push(entry.path).map(|_| ()).inspect_err(|_| {
            self.halted.store(true, Ordering::SeqCst);
        })
    }

    fn descend(&self, dir: &Path, rules: IgnoreRuleSet) -> Result<()> {
        self.counters.dirs.fetch_add(1, Ordering::Relaxed);
        let children = Entry::list(dir)?;

        let mut first_error: Option<WalkerError> = None;

        thread::scope(|scope| {
            let mut handles: Vec<(PathBuf, thread::ScopedJoinHandle<'_, Result<()>>)> = Vec::new();

            for child in children {
                if self.should_stop() {
                    break;
                }

                let Some(token) = self.admission.try_acquire() else {
                    if let Err(e) = self.walk(child, rules.clone()) {
                        merge_error(&mut first_error, e);
                    }
                    continue;
                };

                let path = child.path.clone();
                let rules = rules.clone();
                let spawned = thread::Builder::new()
                    .name("files-walk".to_string())
                    .stack_size(WALK_STACK_SIZE)
                    .spawn_scoped(scope, move || {
                        let _token = token;
                        self.walk(child, rules)
                    });

                match spawned {
                    Ok(handle) => handles.push((path, handle)),
                    Err(e) => merge_error(
                        &mut first_error,
                        WorkerError::SpawnFailed {
                            path,
                            reason: e.to_string(),
                        }
                        .into(),
                    ),
                }
            }

            for (path, handle) in handles {
                match handle.join() {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => merge_error(&mut first_error, e),
                    Err(panic) => merge_error(
                        &mut first_error,
                        WorkerError::Panicked {
                            path,
                            message: panic_message(panic.as_ref()),
                        }
                        .into(),
                    ),
                }
            }
        });

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn stats(&self, duration: Duration) -> WalkStats {
        let admission = self.admission.stats();
        WalkStats {
            files: self.stream.counter().emitted(),
            dirs: self.counters.dirs.load(Ordering::Relaxed),
            pruned: self.counters.pruned.load(Ordering::Relaxed),
            skipped: self.counters.skipped.load(Ordering::Relaxed),
            spawned: admission.granted,
            inline: admission.refused,
            duration,
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// A running walk: the consumer end of the result stream plus its coordinator
pub struct WalkHandle {
    root: PathBuf,
    paths: Receiver<PathBuf>,
    coordinator: JoinHandle<Result<WalkStats>>,
}

impl WalkHandle {
    /// Blocking iterator over discovered paths; ends when the walk settles
    pub fn paths(&self) -> crossbeam_channel::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    /// Wait for the walk to settle and return its terminal result
    ///
    /// Drops the stream first; a walk that still had paths to deliver ends
    /// with [`WalkerError::ChannelClosed`].
    pub fn finish(self) -> Result<WalkStats> {
        let WalkHandle {
            root,
            paths,
            coordinator,
        } = self;
        drop(paths);

        coordinator.join().map_err(|panic| {
            WalkerError::from(WorkerError::Panicked {
                path: root,
                message: panic_message(panic.as_ref()),
            })
        })?
    }
}
