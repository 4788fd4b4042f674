//! # raft-core
//!
//! why: describe the persistence a raft node depends on, independent of any backend
//! relations: implemented by raft-storage, consumed by consensus logic
//! what: LogEntry type, Log and Store capability traits

pub mod log;
pub mod store;

pub use log::{Log, LogEntry};
pub use store::Store;
