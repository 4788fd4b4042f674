//! # store
//!
//! why: persist the small scalars raft keeps outside the log (current term, voted for)
//! relations: implemented by raft-storage (KvStore, MemoryStore)
//! what: Store trait

/// A durable key/value store for raft's auxiliary state
///
/// Reads of missing keys are not errors: `get` yields an empty vec and
/// `get_int` yields 0.
pub trait Store {
    type Error: std::error::Error + Send + Sync + 'static;

    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), Self::Error>;

    /// value stored under `key`, or an empty vec if there is none
    fn get(&self, key: &[u8]) -> Result<Vec<u8>, Self::Error>;

    fn set_int(&self, key: &[u8], value: u64) -> Result<(), Self::Error>;

    /// integer stored under `key`, or 0 if there is none
    fn get_int(&self, key: &[u8]) -> Result<u64, Self::Error>;
}
