//! Write-buffering overlay that makes one execution step atomic.
//!
//! ```ignore
//! let mut step = CachedStore::new(&mut store);
//! engine.execute(&mut step, request)?;
//! step.commit()?;
//! ```
//!
//! If the overlay is dropped without calling [`CachedStore::commit`], every
//! buffered operation is discarded and the base store is untouched.

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use tracing::trace;

use crate::{KvStore, ScanVisitor, StoreError, WriteBatch};

/// Overlay over a base store. Reads observe buffered writes.
pub struct CachedStore<'a, S: KvStore> {
    base: &'a mut S,
    /// `Some(value)` for a buffered put, `None` for a buffered delete.
    pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, S: KvStore> CachedStore<'a, S> {
    pub fn new(base: &'a mut S) -> Self {
        Self {
            base,
            pending: BTreeMap::new(),
        }
    }

    /// Number of keys with a buffered mutation.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Flush every buffered mutation to the base store as one batch.
    pub fn commit(self) -> Result<usize, StoreError> {
        let mut batch = WriteBatch::new();
        for (key, op) in self.pending {
            match op {
                Some(value) => batch.put(key, value),
                None => batch.delete(key),
            }
        }
        let written = batch.len();
        if written > 0 {
            self.base.write_batch(batch)?;
        }
        trace!(ops = written, "committed cached store");
        Ok(written)
    }
}

impl<S: KvStore> KvStore for CachedStore<'_, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        match self.pending.get(key) {
            Some(op) => Ok(op.clone()),
            None => self.base.get(key),
        }
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.pending.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.pending.insert(key.to_vec(), None);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8], visit: &mut ScanVisitor<'_>) -> Result<(), StoreError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();
        self.base.scan_prefix(prefix, &mut |key, value| {
            merged.insert(key.to_vec(), value.to_vec());
            Ok(ControlFlow::Continue(()))
        })?;
        for (key, op) in self.pending.range(prefix.to_vec()..) {
            if !key.starts_with(prefix) {
                break;
            }
            match op {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        for (key, value) in &merged {
            if visit(key, value)?.is_break() {
                break;
            }
        }
        Ok(())
    }
}
