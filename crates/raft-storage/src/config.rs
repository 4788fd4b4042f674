//! # config
//!
//! why: open the database file and both persistence components from one place
//! relations: builds OrderedLog (log.rs) and KvStore (store.rs) over a shared redb Database
//! what: StorageConfig, RaftStorage

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use redb::Database;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::codec::CodecKind;
use crate::log::{LogConfig, OrderedLog, DEFAULT_LOG_PARTITION};
use crate::store::{KvStore, StoreConfig, DEFAULT_STORE_PARTITION};
use crate::{Error, Result};

/// Where and how raft state is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the redb database file.
    pub path: PathBuf,
    pub log_partition: String,
    pub store_partition: String,
    /// Encoding of log entries.
    pub codec: CodecKind,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("raft.redb"),
            log_partition: DEFAULT_LOG_PARTITION.to_string(),
            store_partition: DEFAULT_STORE_PARTITION.to_string(),
            codec: CodecKind::default(),
        }
    }
}

impl StorageConfig {
    /// Default settings with the database at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            partition: self.log_partition.clone(),
            codec: self.codec,
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            partition: self.store_partition.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.log_partition.is_empty() || self.store_partition.is_empty() {
            return Err(Error::Config("partition names must not be empty".into()));
        }
        if self.log_partition == self.store_partition {
            return Err(Error::Config(format!(
                "log and store cannot share partition {:?}",
                self.log_partition
            )));
        }
        Ok(())
    }

    /// Open (or create) the database and both components.
    pub fn open(&self) -> Result<RaftStorage> {
        self.validate()?;
        let db = open_database(&self.path)?;
        Ok(RaftStorage {
            log: OrderedLog::new(db.clone(), &self.log_config())?,
            store: KvStore::new(db, &self.store_config())?,
        })
    }
}

/// Open an existing redb file or create it, along with its parent directory.
pub fn open_database(path: &Path) -> Result<Arc<Database>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let db = Database::create(path)?;
    info!(path = %path.display(), "opened raft database");
    Ok(Arc::new(db))
}

/// The persisted state of one raft node: its log and its scalar store.
#[derive(Debug, Clone)]
pub struct RaftStorage {
    pub log: OrderedLog,
    pub store: KvStore,
}
