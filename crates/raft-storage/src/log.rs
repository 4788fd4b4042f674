//! # log
//!
//! why: keep the raft log durable, gap-free and ordered on top of a sorted byte store
//! relations: implements raft_core::Log using partition.rs, key.rs and codec.rs
//! what: OrderedLog, LogConfig

use std::fmt;
use std::sync::Arc;

use raft_core::{Log, LogEntry};
use redb::Database;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::{CodecKind, EntryCodec};
use crate::partition::{Partition, Tx, WriteTx};
use crate::{key, Error, Result};

/// Partition used by the log when none is configured.
pub const DEFAULT_LOG_PARTITION: &str = "raft.log.bucket";

/// Settings for one [`OrderedLog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Name of the partition holding the entries; owned by this log alone.
    pub partition: String,
    /// Encoding of stored entries.
    pub codec: CodecKind,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            partition: DEFAULT_LOG_PARTITION.to_string(),
            codec: CodecKind::default(),
        }
    }
}

/// Raft log persisted in a redb partition.
///
/// Entry `i` lives under key `key::encode(i)`, so the partition's byte order
/// is the log order. Nothing is cached: every call reads the partition, and
/// every mutation is a single write transaction. That transaction is also
/// where `append` reads the current last index, so concurrent appenders are
/// serialized by redb and can never be handed the same index.
#[derive(Clone)]
pub struct OrderedLog {
    partition: Partition,
    codec: Arc<dyn EntryCodec>,
}

impl OrderedLog {
    pub fn new(db: Arc<Database>, config: &LogConfig) -> Result<Self> {
        Self::with_codec(db, &config.partition, config.codec.build())
    }

    /// Open a log with a caller-supplied entry encoding.
    pub fn with_codec(db: Arc<Database>, partition: &str, codec: Arc<dyn EntryCodec>) -> Result<Self> {
        let partition = Partition::ensure(db, partition)?;
        Ok(Self { partition, codec })
    }

    pub fn partition(&self) -> &str {
        self.partition.name()
    }

    fn decode_at(&self, index: u64, value: &[u8]) -> Result<LogEntry> {
        let entry = self.codec.unmarshal(value)?;
        if entry.index != index {
            return Err(Error::Decode(format!(
                "entry stored under index {index} claims index {}",
                entry.index
            )));
        }
        Ok(entry)
    }

    fn last_in<T>(&self, tx: &Tx<T>) -> Result<(u64, u64)>
    where
        T: redb::ReadableTable<&'static [u8], &'static [u8]>,
    {
        match tx.last()? {
            Some((k, v)) => {
                let index = key::decode(&k)?;
                let entry = self.decode_at(index, &v)?;
                Ok((index, entry.term))
            }
            None => Ok((0, 0)),
        }
    }

    /// Delete every entry after `index` inside an already open transaction.
    fn truncate_in(&self, tx: &mut WriteTx<'_>, index: u64) -> Result<usize> {
        let (last, _) = self.last_in(tx)?;
        let mut removed = 0;
        for doomed in (index.saturating_add(1)..=last).rev() {
            if tx.delete(&key::encode(doomed))? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl Log for OrderedLog {
    type Error = Error;

    fn get(&self, index: u64) -> Result<Option<u64>> {
        self.partition.read(|tx| match tx.get(&key::encode(index))? {
            Some(value) => Ok(Some(self.decode_at(index, &value)?.term)),
            None => Ok(None),
        })
    }

    fn last(&self) -> Result<(u64, u64)> {
        self.partition.read(|tx| self.last_in(tx))
    }

    fn range_get(&self, after: u64, upto: u64) -> Result<Vec<LogEntry>> {
        if after >= upto {
            return Ok(Vec::new());
        }

        self.partition.read(|tx| {
            let start = key::encode(after + 1);
            let mut entries = Vec::new();
            for item in tx.seek(&start)? {
                let (k, v) = item?;
                let index = key::decode(&k)?;
                if index > upto {
                    break;
                }
                entries.push(self.decode_at(index, &v)?);
            }
            Ok(entries)
        })
    }

    fn pop_after(&self, index: u64) -> Result<usize> {
        let removed = self.partition.write(|tx| self.truncate_in(tx, index))?;
        if removed > 0 {
            debug!(partition = self.partition(), after = index, removed, "truncated log suffix");
        }
        Ok(removed)
    }

    fn append(&self, entries: &[LogEntry]) -> Result<u64> {
        let (first, last) = self.partition.write(|tx| {
            let (last, _) = self.last_in(tx)?;
            let mut next = last;
            for entry in entries {
                next += 1;
                let positioned = LogEntry {
                    index: next,
                    ..entry.clone()
                };
                let value = self.codec.marshal(&positioned)?;
                tx.put(&key::encode(next), &value)?;
            }
            Ok((last + 1, next))
        })?;

        if !entries.is_empty() {
            debug!(partition = self.partition(), first, last, "appended log entries");
        }
        Ok(last)
    }
}

impl fmt::Debug for OrderedLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedLog")
            .field("partition", &self.partition.name())
            .finish()
    }
}
