//! Nullable store: in-memory ordered key-value storage for testing.

use std::cell::Cell;
use std::collections::BTreeMap;

use exp_store::{KvStore, ScanVisitor, StoreError};

/// An in-memory [`KvStore`] backed by a `BTreeMap`, so scans come back in
/// key order just like LMDB.
#[derive(Default)]
pub struct NullStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
    fail_writes: Cell<bool>,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All keys, in order.
    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.entries.keys().cloned().collect()
    }

    /// Make every subsequent `put` and `delete` fail with a backend error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::Backend("null store: writes disabled".into()));
        }
        Ok(())
    }
}

impl KvStore for NullStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.check_writable()?;
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.check_writable()?;
        self.entries.remove(key);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8], visit: &mut ScanVisitor<'_>) -> Result<(), StoreError> {
        for (key, value) in self.entries.range(prefix.to_vec()..) {
            if !key.starts_with(prefix) {
                break;
            }
            if visit(key, value)?.is_break() {
                break;
            }
        }
        Ok(())
    }
}
