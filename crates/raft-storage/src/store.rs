//! # store
//!
//! why: persist raft's scalar state (current term, voted for) next to the log
//! relations: implements raft_core::Store using partition.rs
//! what: KvStore, StoreConfig

use std::sync::Arc;

use raft_core::Store;
use redb::Database;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::partition::Partition;
use crate::key::{decode as decode_int, encode as encode_int};
use crate::{Error, Result};

/// Partition used by the store when none is configured.
pub const DEFAULT_STORE_PARTITION: &str = "raft.store.bucket";

const CURRENT_TERM: &[u8] = b"currentTerm";
const VOTED_FOR: &[u8] = b"votedFor";

/// Settings for one [`KvStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub partition: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            partition: DEFAULT_STORE_PARTITION.to_string(),
        }
    }
}

/// Key/value store persisted in its own redb partition.
///
/// Every call is one transaction. Integers are stored as 8-byte big-endian values.
#[derive(Debug, Clone)]
pub struct KvStore {
    partition: Partition,
}

impl KvStore {
    pub fn new(db: Arc<Database>, config: &StoreConfig) -> Result<Self> {
        let partition = Partition::ensure(db, &config.partition)?;
        Ok(Self { partition })
    }

    pub fn current_term(&self) -> Result<u64> {
        self.get_int(CURRENT_TERM)
    }

    pub fn set_current_term(&self, term: u64) -> Result<()> {
        self.set_int(CURRENT_TERM, term)
    }

    /// node voted for in the current term, if any
    ///
    /// Node ids are non-zero; a stored 0 means no vote.
    pub fn voted_for(&self) -> Result<Option<u64>> {
        Ok(Some(self.get_int(VOTED_FOR)?).filter(|&id| id != 0))
    }

    pub fn set_voted_for(&self, node: Option<u64>) -> Result<()> {
        self.set_int(VOTED_FOR, node.unwrap_or(0))
    }
}

impl Store for KvStore {
    type Error = Error;

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.partition.write(|tx| tx.put(key, value))?;
        debug!(partition = self.partition.name(), len = value.len(), "stored value");
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        let value = self.partition.read(|tx| tx.get(key))?;
        Ok(value.unwrap_or_default())
    }

    fn set_int(&self, key: &[u8], value: u64) -> Result<()> {
        self.partition.write(|tx| tx.put(key, &encode_int(value)))?;
        debug!(partition = self.partition.name(), value, "stored integer");
        Ok(())
    }

    fn get_int(&self, key: &[u8]) -> Result<u64> {
        match self.partition.read(|tx| tx.get(key))? {
            Some(bytes) => decode_int(&bytes),
            None => Ok(0),
        }
    }
}
