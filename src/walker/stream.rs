//! Result stream and emit counter
//!
//! All traversal branches push discovered paths into one bounded channel.
//! A full channel blocks the producer, which is how a slow consumer slows
//! the whole walk down. The emit counter is the only mutable state shared
//! by every branch; it is a single atomic so concurrent emits cannot race
//! past the configured maximum.
//!
//! Paths travel as `PathBuf` so names that are not valid UTF-8 reach the
//! consumer unchanged.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::config::MaxResults;
use crate::error::{Result, WalkerError};

/// Default result stream capacity
pub const DEFAULT_STREAM_CAPACITY: usize = 20;

/// Shared count of emitted files
#[derive(Debug)]
pub struct EmitCounter {
    count: AtomicU64,
    max: MaxResults,
    overflowed: AtomicBool,
}

impl EmitCounter {
    /// Create a counter enforcing `max`
    pub fn new(max: MaxResults) -> Self {
        Self {
            count: AtomicU64::new(0),
            max,
            overflowed: AtomicBool::new(false),
        }
    }

    /// Reserve the next slot
    ///
    /// Returns the new count, or the overflow sentinel once the maximum is
    /// passed. Every caller gets a distinct count, so at most `max` calls
    /// ever succeed.
    pub fn increment(&self) -> Result<u64> {
        let n = self.count.fetch_add(1, Ordering::AcqRel) + 1;
        match self.max {
            MaxResults::Limit(max) if n > max => {
                self.overflowed.store(true, Ordering::Release);
                Err(WalkerError::Overflow { max })
            }
            _ => Ok(n),
        }
    }

    /// True once an increment has returned the overflow sentinel
    pub fn overflowed(&self) -> bool {
        self.overflowed.load(Ordering::Acquire)
    }

    /// Files successfully counted (capped at the maximum)
    pub fn emitted(&self) -> u64 {
        let count = self.count.load(Ordering::Acquire);
        match self.max {
            MaxResults::Limit(max) => count.min(max),
            MaxResults::Unbounded => count,
        }
    }
}

/// Producer side of the result stream
///
/// Dropping the last `ResultStream` closes the channel and ends the
/// consumer's read loop. Once the consumer is gone no further counts are
/// claimed, so a disconnect is never reported as an overflow.
#[derive(Debug)]
pub struct ResultStream {
    sender: Sender<PathBuf>,
    counter: EmitCounter,
    disconnected: AtomicBool,
}

impl ResultStream {
    /// Open a bounded stream; returns the producer and the consumer ends
    pub fn open(capacity: usize, max: MaxResults) -> (Self, Receiver<PathBuf>) {
        let (sender, receiver) = bounded(capacity);
        (
            Self {
                sender,
                counter: EmitCounter::new(max),
                disconnected: AtomicBool::new(false),
            },
            receiver,
        )
    }

    /// Count and push one path, blocking while the stream is full
    pub fn push(&self, path: PathBuf) -> Result<u64> {
        if self.disconnected.load(Ordering::Acquire) {
            return Err(WalkerError::ChannelClosed);
        }

        let n = self.counter.increment()?;
        self.sender.send(path).map_err(|_| {
            self.disconnected.store(true, Ordering::Release);
            WalkerError::ChannelClosed
        })?;
        Ok(n)
    }

    /// The shared emit counter
    pub fn counter(&self) -> &EmitCounter {
        &self.counter
    }
}
