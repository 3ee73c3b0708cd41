//! LMDB implementation of `KvStore`.
//!
//! Single-key operations run in their own transaction. `write_batch` applies
//! a whole batch inside one write transaction, so a committed execution step
//! lands on disk entirely or not at all.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use exp_store::{BatchOp, KvStore, ScanVisitor, StoreError, WriteBatch};

use crate::LmdbError;

pub struct LmdbKvStore {
    env: Arc<Env>,
    db: Database<Bytes, Bytes>,
}

impl LmdbKvStore {
    pub(crate) fn new(env: Arc<Env>, db: Database<Bytes, Bytes>) -> Self {
        Self { env, db }
    }

    /// Number of entries across all collections.
    pub fn len(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.db.len(&rtxn).map_err(LmdbError::from)?)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl KvStore for LmdbKvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let value = self.db.get(&rtxn, key).map_err(LmdbError::from)?;
        Ok(value.map(|v| v.to_vec()))
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db.put(&mut wtxn, key, value).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db.delete(&mut wtxn, key).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8], visit: &mut ScanVisitor<'_>) -> Result<(), StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.db.prefix_iter(&rtxn, prefix).map_err(LmdbError::from)?;
        for result in iter {
            let (key, value) = result.map_err(LmdbError::from)?;
            if visit(key, value)?.is_break() {
                break;
            }
        }
        Ok(())
    }

    fn write_batch(&mut self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        for op in batch.into_ops() {
            match op {
                BatchOp::Put { key, value } => {
                    self.db.put(&mut wtxn, &key, &value).map_err(LmdbError::from)?;
                }
                BatchOp::Delete { key } => {
                    self.db.delete(&mut wtxn, &key).map_err(LmdbError::from)?;
                }
            }
        }
        // Dropping `wtxn` on an early return above aborts the transaction.
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
