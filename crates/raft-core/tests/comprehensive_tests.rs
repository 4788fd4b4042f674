//! # comprehensive core tests
//!
//! why: verify the Log and Store contracts can be implemented and used generically
//! relations: tests raft-core crate
//! what: default match semantics, trait objects, generic consumers

use raft_core::{Log, LogEntry, Store};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;

// =============================================================================
// TEST DOUBLES
// =============================================================================

/// minimal log keeping entries in a vec, enough to exercise the trait defaults
#[derive(Default)]
struct VecLog {
    entries: RefCell<Vec<LogEntry>>,
}

impl Log for VecLog {
    type Error = Infallible;

    fn get(&self, index: u64) -> Result<Option<u64>, Self::Error> {
        Ok(self
            .entries
            .borrow()
            .iter()
            .find(|e| e.index == index)
            .map(|e| e.term))
    }

    fn last(&self) -> Result<(u64, u64), Self::Error> {
        Ok(self
            .entries
            .borrow()
            .last()
            .map(|e| (e.index, e.term))
            .unwrap_or((0, 0)))
    }

    fn range_get(&self, after: u64, upto: u64) -> Result<Vec<LogEntry>, Self::Error> {
        Ok(self
            .entries
            .borrow()
            .iter()
            .filter(|e| e.index > after && e.index <= upto)
            .cloned()
            .collect())
    }

    fn pop_after(&self, index: u64) -> Result<usize, Self::Error> {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| e.index <= index);
        Ok(before - entries.len())
    }

    fn append(&self, batch: &[LogEntry]) -> Result<u64, Self::Error> {
        let mut entries = self.entries.borrow_mut();
        let mut last = entries.last().map(|e| e.index).unwrap_or(0);
        for entry in batch {
            last += 1;
            entries.push(LogEntry { index: last, ..entry.clone() });
        }
        Ok(last)
    }
}

#[derive(Debug)]
struct Broken;

impl fmt::Display for Broken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("storage is broken")
    }
}

impl std::error::Error for Broken {}

/// log whose every read fails
struct BrokenLog;

impl Log for BrokenLog {
    type Error = Broken;

    fn get(&self, _index: u64) -> Result<Option<u64>, Self::Error> {
        Err(Broken)
    }

    fn last(&self) -> Result<(u64, u64), Self::Error> {
        Err(Broken)
    }

    fn range_get(&self, _after: u64, _upto: u64) -> Result<Vec<LogEntry>, Self::Error> {
        Err(Broken)
    }

    fn pop_after(&self, _index: u64) -> Result<usize, Self::Error> {
        Err(Broken)
    }

    fn append(&self, _entries: &[LogEntry]) -> Result<u64, Self::Error> {
        Err(Broken)
    }
}

#[derive(Default)]
struct MapStore {
    values: RefCell<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl Store for MapStore {
    type Error = Infallible;

    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), Self::Error> {
        self.values.borrow_mut().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>, Self::Error> {
        Ok(self.values.borrow().get(key).cloned().unwrap_or_default())
    }

    fn set_int(&self, key: &[u8], value: u64) -> Result<(), Self::Error> {
        self.set(key, &value.to_be_bytes())
    }

    fn get_int(&self, key: &[u8]) -> Result<u64, Self::Error> {
        let bytes = self.get(key)?;
        Ok(bytes.try_into().map(u64::from_be_bytes).unwrap_or(0))
    }
}

/// what a follower does on AppendEntries: check prev, drop conflicts, append
fn accept<L: Log>(
    log: &L,
    prev_index: u64,
    prev_term: u64,
    entries: &[LogEntry],
) -> Result<bool, L::Error> {
    if prev_index != 0 && !log.matches(prev_index, prev_term)? {
        return Ok(false);
    }
    log.pop_after(prev_index)?;
    log.append(entries)?;
    Ok(true)
}

// =============================================================================
// SECTION 1: DEFAULT MATCH SEMANTICS
// =============================================================================

mod match_semantics {
    use super::*;

    #[test]
    fn missing_entry_never_matches() {
        let log = VecLog::default();
        assert!(!log.matches(1, 0).unwrap());
        assert!(!log.matches(0, 0).unwrap());
    }

    #[test]
    fn matches_only_the_stored_term() {
        let log = VecLog::default();
        log.append(&[LogEntry::new(1, "a"), LogEntry::new(2, "b")]).unwrap();

        assert!(log.matches(1, 1).unwrap());
        assert!(log.matches(2, 2).unwrap());
        assert!(!log.matches(2, 1).unwrap());
        assert!(!log.matches(3, 2).unwrap());
    }

    #[test]
    fn match_propagates_storage_errors() {
        assert!(BrokenLog.matches(1, 1).is_err());
    }
}

// =============================================================================
// SECTION 2: GENERIC CONSUMERS
// =============================================================================

mod generic_consumers {
    use super::*;

    #[test]
    fn follower_accepts_from_empty_log() {
        let log = VecLog::default();
        assert!(accept(&log, 0, 0, &[LogEntry::new(1, "x")]).unwrap());
        assert_eq!(log.last().unwrap(), (1, 1));
    }

    #[test]
    fn follower_rejects_on_mismatch() {
        let log = VecLog::default();
        log.append(&[LogEntry::new(1, "x")]).unwrap();

        assert!(!accept(&log, 1, 2, &[LogEntry::new(2, "y")]).unwrap());
        assert_eq!(log.last().unwrap(), (1, 1));
    }

    #[test]
    fn follower_replaces_conflicting_suffix() {
        let log = VecLog::default();
        log.append(&[
            LogEntry::new(1, "a"),
            LogEntry::new(1, "b"),
            LogEntry::new(1, "stale"),
        ])
        .unwrap();

        assert!(accept(&log, 2, 1, &[LogEntry::new(3, "fresh")]).unwrap());

        let entries = log.range_get(0, 10).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2], LogEntry::at(3, 3, "fresh"));
    }

    #[test]
    fn log_usable_as_trait_object() {
        let log: Box<dyn Log<Error = Infallible>> = Box::new(VecLog::default());
        assert_eq!(log.append(&[LogEntry::new(5, "z")]).unwrap(), 1);
        assert_eq!(log.get(1).unwrap(), Some(5));
    }
}

// =============================================================================
// SECTION 3: STORE CONTRACT
// =============================================================================

mod store_contract {
    use super::*;

    #[test]
    fn missing_values_read_as_empty_and_zero() {
        let store = MapStore::default();
        assert!(store.get(b"votedFor").unwrap().is_empty());
        assert_eq!(store.get_int(b"currentTerm").unwrap(), 0);
    }

    #[test]
    fn values_round_trip() {
        let store = MapStore::default();
        store.set(b"k", b"v").unwrap();
        store.set_int(b"currentTerm", 9).unwrap();

        assert_eq!(store.get(b"k").unwrap(), b"v".to_vec());
        assert_eq!(store.get_int(b"currentTerm").unwrap(), 9);
    }
}
