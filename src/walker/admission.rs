//! Fixed-capacity admission tokens
//!
//! Bounds how many subtree traversals run on their own thread at once.
//! Acquisition never blocks: when the pool is exhausted the caller recurses
//! inline instead, so peak thread count stays at the pool capacity no matter
//! how wide or deep the tree is.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Default number of concurrent subtree traversals
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Snapshot of admission decisions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdmissionStats {
    /// Tokens handed out (subtrees walked on their own thread)
    pub granted: u64,

    /// Attempts that found the pool exhausted (subtrees walked inline)
    pub refused: u64,
}

#[derive(Debug, Default)]
struct AdmissionCounters {
    granted: AtomicU64,
    refused: AtomicU64,
}

/// Pool of admission tokens
#[derive(Debug)]
pub struct AdmissionPool {
    capacity: usize,
    in_use: AtomicUsize,
    counters: AdmissionCounters,
}

impl AdmissionPool {
    /// Create a pool with `capacity` tokens
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            in_use: AtomicUsize::new(0),
            counters: AdmissionCounters::default(),
        }
    }

    /// Take a token if one is free
    pub fn try_acquire(&self) -> Option<AdmissionToken<'_>> {
        let acquired = self
            .in_use
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.capacity).then_some(n + 1)
            })
            .is_ok();

        if acquired {
            self.counters.granted.fetch_add(1, Ordering::Relaxed);
            Some(AdmissionToken { pool: self })
        } else {
            self.counters.refused.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    /// Tokens currently held
    pub fn in_use(&self) -> usize {
        self.in_use.load(Ordering::Acquire)
    }

    /// Admission decisions so far
    pub fn stats(&self) -> AdmissionStats {
        AdmissionStats {
            granted: self.counters.granted.load(Ordering::Relaxed),
            refused: self.counters.refused.load(Ordering::Relaxed),
        }
    }
}

/// A held token; released on drop
#[derive(Debug)]
pub struct AdmissionToken<'a> {
    pool: &'a AdmissionPool,
}

impl Drop for AdmissionToken<'_> {
    fn drop(&mut self) {
        self.pool.in_use.fetch_sub(1, Ordering::AcqRel);
    }
}
