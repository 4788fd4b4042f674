//! # memory
//!
//! why: run raft code against the log and store contracts without touching disk
//! relations: same traits as OrderedLog and KvStore, used by tests and ephemeral nodes
//! what: MemoryLog, MemoryStore

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use raft_core::{Log, LogEntry, Store};

use crate::key::{decode as decode_int, encode as encode_int};
use crate::{Error, Result};

/// in-memory raft log
///
/// no persistence across restarts. Holding the lock for a whole call gives
/// the same atomicity the redb-backed log gets from its transactions.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Log for MemoryLog {
    type Error = Error;

    // entry i sits at position i - 1, the contiguity invariant keeps that true

    fn get(&self, index: u64) -> Result<Option<u64>> {
        let entries = self.entries();
        let Some(pos) = index.checked_sub(1) else {
            return Ok(None);
        };
        Ok(usize::try_from(pos)
            .ok()
            .and_then(|pos| entries.get(pos))
            .map(|e| e.term))
    }

    fn last(&self) -> Result<(u64, u64)> {
        Ok(self
            .entries()
            .last()
            .map(|e| (e.index, e.term))
            .unwrap_or((0, 0)))
    }

    fn range_get(&self, after: u64, upto: u64) -> Result<Vec<LogEntry>> {
        let entries = self.entries();
        let len = entries.len() as u64;
        let start = after.min(len) as usize;
        let end = upto.min(len) as usize;
        if start >= end {
            return Ok(Vec::new());
        }
        Ok(entries[start..end].to_vec())
    }

    fn pop_after(&self, index: u64) -> Result<usize> {
        let mut entries = self.entries();
        let keep = index.min(entries.len() as u64) as usize;
        let removed = entries.len() - keep;
        entries.truncate(keep);
        Ok(removed)
    }

    fn append(&self, batch: &[LogEntry]) -> Result<u64> {
        let mut entries = self.entries();
        let mut next = entries.len() as u64;
        entries.reserve(batch.len());
        for entry in batch {
            next += 1;
            entries.push(LogEntry {
                index: next,
                ..entry.clone()
            });
        }
        Ok(next)
    }
}

/// in-memory key/value store
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> MutexGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store for MemoryStore {
    type Error = Error;

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.values().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        Ok(self.values().get(key).cloned().unwrap_or_default())
    }

    fn set_int(&self, key: &[u8], value: u64) -> Result<()> {
        self.set(key, &encode_int(value))
    }

    fn get_int(&self, key: &[u8]) -> Result<u64> {
        match self.values().get(key) {
            Some(bytes) => decode_int(bytes),
            None => Ok(0),
        }
    }
}
