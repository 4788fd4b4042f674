//! # log
//!
//! why: define what a raft node needs from its persisted log
//! relations: implemented by raft-storage (OrderedLog, MemoryLog), consumed by consensus code
//! what: LogEntry struct, Log trait

use serde::{Deserialize, Serialize};

/// A single entry in the replicated log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// The position of this entry in the log (1-indexed, assigned by the log on append)
    pub index: u64,
    /// The term when this entry was created
    pub term: u64,
    /// The opaque command to be applied to the state machine
    pub payload: Vec<u8>,
}

impl LogEntry {
    /// Create a new, not yet positioned log entry
    ///
    /// The index stays 0 until the entry is appended to a log.
    pub fn new(term: u64, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            index: 0,
            term,
            payload: payload.into(),
        }
    }

    /// Create a log entry at a known position
    pub fn at(index: u64, term: u64, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            index,
            term,
            payload: payload.into(),
        }
    }
}

/// The persisted raft log as seen by consensus code
///
/// Entries always occupy the contiguous range `1..=last`. Implementations
/// assign indices themselves on [`Log::append`]; whatever index the caller
/// put on an entry is overwritten.
///
/// A missing entry is never an error: `get` returns `None`, `matches`
/// returns `false` and `range_get` returns an empty vec. Errors mean the
/// backing storage is broken.
pub trait Log {
    type Error: std::error::Error + Send + Sync + 'static;

    /// term of the entry at `index`, if there is one
    fn get(&self, index: u64) -> Result<Option<u64>, Self::Error>;

    /// whether an entry exists at `index` with exactly `term`
    ///
    /// No sentinel handling: `(0, 0)` only matches if an entry 0 with term 0 exists,
    /// which never happens. Callers that treat it as "always matches" do so themselves.
    fn matches(&self, index: u64, term: u64) -> Result<bool, Self::Error> {
        Ok(self.get(index)? == Some(term))
    }

    /// index and term of the last entry, `(0, 0)` when the log is empty
    fn last(&self) -> Result<(u64, u64), Self::Error>;

    /// entries with index in `(after, upto]`, ascending
    fn range_get(&self, after: u64, upto: u64) -> Result<Vec<LogEntry>, Self::Error>;

    /// remove every entry with index greater than `index`, atomically
    ///
    /// Returns how many entries were removed. A no-op when `index >= last`.
    fn pop_after(&self, index: u64) -> Result<usize, Self::Error>;

    /// append `entries` at `last + 1, last + 2, ...` in the order given, atomically
    ///
    /// Returns the new last index.
    fn append(&self, entries: &[LogEntry]) -> Result<u64, Self::Error>;
}
