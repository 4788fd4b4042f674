//! # codec
//!
//! why: decide how a log entry is laid out as a stored value
//! relations: used by log.rs, selected through LogConfig / StorageConfig
//! what: EntryCodec trait, JsonCodec, BincodeCodec, CodecKind
//!
//! The log stores each [`LogEntry`] as an opaque value. How that value is
//! laid out is decided by an [`EntryCodec`], so deployments can choose a
//! readable or a compact encoding without touching the log itself.

use std::sync::Arc;

use raft_core::LogEntry;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Converts log entries to and from their stored bytes.
///
/// Encodings must be deterministic and must carry the index, term and payload.
pub trait EntryCodec: Send + Sync {
    fn marshal(&self, entry: &LogEntry) -> Result<Vec<u8>>;

    fn unmarshal(&self, bytes: &[u8]) -> Result<LogEntry>;
}

/// JSON encoding via serde_json. Readable with any JSON tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl EntryCodec for JsonCodec {
    fn marshal(&self, entry: &LogEntry) -> Result<Vec<u8>> {
        serde_json::to_vec(entry).map_err(|e| Error::Encode(e.to_string()))
    }

    fn unmarshal(&self, bytes: &[u8]) -> Result<LogEntry> {
        serde_json::from_slice(bytes).map_err(|e| Error::Decode(e.to_string()))
    }
}

/// Compact binary encoding via bincode.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl EntryCodec for BincodeCodec {
    fn marshal(&self, entry: &LogEntry) -> Result<Vec<u8>> {
        bincode::serialize(entry).map_err(|e| Error::Encode(e.to_string()))
    }

    fn unmarshal(&self, bytes: &[u8]) -> Result<LogEntry> {
        bincode::deserialize(bytes).map_err(|e| Error::Decode(e.to_string()))
    }
}

/// Codec selection as it appears in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    #[default]
    Json,
    Bincode,
}

impl CodecKind {
    pub fn build(self) -> Arc<dyn EntryCodec> {
        match self {
            Self::Json => Arc::new(JsonCodec),
            Self::Bincode => Arc::new(BincodeCodec),
        }
    }
}
