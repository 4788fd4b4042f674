//! # key
//!
//! why: make redb's byte ordering agree with log index ordering
//! relations: used by log.rs for entry keys, store.rs and memory.rs for integer values
//! what: encode, decode, KEY_WIDTH
//!
//! Indices are stored as 8-byte big-endian keys so that redb's
//! lexicographic byte ordering agrees with numeric ordering.

use crate::{Error, Result};

/// Width in bytes of every encoded key.
pub const KEY_WIDTH: usize = 8;

/// Encode `index` as a fixed-width big-endian key.
pub fn encode(index: u64) -> [u8; KEY_WIDTH] {
    index.to_be_bytes()
}

/// Decode a key produced by [`encode`].
pub fn decode(key: &[u8]) -> Result<u64> {
    let bytes: [u8; KEY_WIDTH] = key.try_into().map_err(|_| Error::Codec {
        expected: KEY_WIDTH,
        actual: key.len(),
    })?;
    Ok(u64::from_be_bytes(bytes))
}
