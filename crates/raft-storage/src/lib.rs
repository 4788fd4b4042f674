//! # raft-storage
//!
//! why: provide durable persistence for raft state on an embedded transactional store
//! relations: implements the raft-core Log and Store traits on top of redb
//! what: OrderedLog, KvStore, in-memory counterparts, configuration
//!
//! Every log entry is kept in a redb table under an 8-byte big-endian key
//! (see [`key`]), so the table's byte order is the log order. Each operation
//! runs in exactly one transaction ([`partition`]); mutations either commit
//! completely or leave no trace.

pub mod codec;
pub mod config;
mod error;
pub mod key;
pub mod log;
pub mod memory;
pub mod partition;
pub mod store;

pub use codec::{BincodeCodec, CodecKind, EntryCodec, JsonCodec};
pub use config::{open_database, RaftStorage, StorageConfig};
pub use error::{Error, Result};
pub use log::{LogConfig, OrderedLog};
pub use memory::{MemoryLog, MemoryStore};
pub use store::{KvStore, StoreConfig};

pub use raft_core::{Log, LogEntry, Store};
