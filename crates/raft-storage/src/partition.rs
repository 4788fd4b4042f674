//! # partition
//!
//! why: give the log and the store scoped, all-or-nothing transactions over one named table
//! relations: wraps redb, used by log.rs and store.rs
//! what: Partition, Tx (ReadTx / WriteTx), Cursor
//!
//! A [`Partition`] is the only way the log and the store touch redb. Each
//! call to [`Partition::read`] or [`Partition::write`] runs a closure inside
//! exactly one transaction; a write commits when the closure returns `Ok`
//! and is aborted, with no visible effect, when it returns `Err`.

use std::fmt;
use std::sync::Arc;

use redb::{AccessGuard, Database, ReadOnlyTable, ReadableTable, Table, TableDefinition};
use tracing::{info, warn};

use crate::{Error, Result};

type Raw = &'static [u8];

/// A named, byte-keyed partition of a redb database.
#[derive(Clone)]
pub struct Partition {
    db: Arc<Database>,
    name: Arc<str>,
}

impl Partition {
    /// Open the partition called `name`, creating it if it does not exist yet.
    ///
    /// redb cannot name a table with the empty string, so that is rejected up front.
    pub fn ensure(db: Arc<Database>, name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::Config("partition name must not be empty".into()));
        }

        let partition = Self {
            db,
            name: Arc::from(name),
        };

        let txn = partition.db.begin_write()?;
        txn.open_table(partition.definition())?;
        txn.commit()?;

        info!(partition = %partition.name, "partition ready");
        Ok(partition)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn definition(&self) -> TableDefinition<'_, Raw, Raw> {
        TableDefinition::new(&self.name)
    }

    /// Run `f` inside a read-only transaction.
    ///
    /// `f` sees a consistent snapshot of committed data only.
    pub fn read<T>(&self, f: impl FnOnce(&ReadTx) -> Result<T>) -> Result<T> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(self.definition())?;
        f(&Tx { table })
    }

    /// Run `f` inside a write transaction, committing only if it succeeds.
    ///
    /// Write transactions on one database are serialized by redb, so a
    /// read-modify-write inside `f` cannot interleave with another writer.
    pub fn write<T>(&self, f: impl FnOnce(&mut WriteTx<'_>) -> Result<T>) -> Result<T> {
        let txn = self.db.begin_write()?;
        let outcome = {
            let table = txn.open_table(self.definition())?;
            let mut tx = Tx { table };
            f(&mut tx)
        };

        match outcome {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(abort) = txn.abort() {
                    warn!(partition = %self.name, error = %abort, "failed to abort write transaction");
                }
                Err(err)
            }
        }
    }
}

impl fmt::Debug for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Partition").field("name", &self.name).finish()
    }
}

/// Handle to a partition inside an open transaction.
pub struct Tx<T> {
    table: T,
}

pub type ReadTx = Tx<ReadOnlyTable<Raw, Raw>>;
pub type WriteTx<'txn> = Tx<Table<'txn, Raw, Raw>>;

impl<T: ReadableTable<Raw, Raw>> Tx<T> {
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.table.get(key)?.map(|value| value.value().to_vec()))
    }

    /// Forward cursor positioned at the first key `>= from`.
    pub fn seek<'a>(&'a self, from: &'a [u8]) -> Result<Cursor<'a>> {
        let range = self.table.range::<&[u8]>(from..)?;
        Ok(Cursor { range })
    }

    /// The pair with the highest key, if the partition is not empty.
    pub fn last(&self) -> Result<Option<(Vec<u8>, Vec<u8>)>> {
        self.table.iter()?.next_back().map(owned).transpose()
    }
}

impl WriteTx<'_> {
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.table.insert(key, value)?;
        Ok(())
    }

    /// Remove `key`, returning whether it was present.
    pub fn delete(&mut self, key: &[u8]) -> Result<bool> {
        Ok(self.table.remove(key)?.is_some())
    }
}

/// Ascending iterator over owned key/value pairs.
pub struct Cursor<'a> {
    range: redb::Range<'a, Raw, Raw>,
}

impl Iterator for Cursor<'_> {
    type Item = Result<(Vec<u8>, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.range.next().map(owned)
    }
}

fn owned(
    item: std::result::Result<(AccessGuard<'_, Raw>, AccessGuard<'_, Raw>), redb::StorageError>,
) -> Result<(Vec<u8>, Vec<u8>)> {
    let (key, value) = item?;
    Ok((key.value().to_vec(), value.value().to_vec()))
}
