//! # error
//!
//! why: one error type for every failure the storage layer can surface
//! relations: returned by partition.rs, log.rs, store.rs, memory.rs, config.rs
//! what: Error, Result

/// Errors returned by [`OrderedLog`](crate::OrderedLog) and [`KvStore`](crate::KvStore).
///
/// Missing entries and keys are not errors. Every variant here means the
/// storage is unusable or its contents are not what we wrote.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// redb failed to open, begin, read, write or commit.
    #[error("storage error: {0}")]
    Storage(#[from] redb::Error),

    /// Filesystem error outside of redb (e.g. creating the data directory).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored key or integer value has the wrong width.
    #[error("invalid integer width: expected {expected} bytes, got {actual}")]
    Codec { expected: usize, actual: usize },

    /// A stored entry could not be decoded, or disagrees with its key.
    #[error("failed to decode entry: {0}")]
    Decode(String),

    /// An entry could not be encoded.
    #[error("failed to encode entry: {0}")]
    Encode(String),

    /// The storage configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

macro_rules! redb_error {
    ($($kind:ty),+ $(,)?) => {
        $(
            impl From<$kind> for Error {
                fn from(err: $kind) -> Self {
                    Error::Storage(err.into())
                }
            }
        )+
    };
}

redb_error!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);
