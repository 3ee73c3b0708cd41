//! The key-value store handle.

use std::ops::ControlFlow;

use crate::{BatchOp, StoreError, WriteBatch};

/// Visitor invoked for each `(key, value)` pair of a prefix scan. Returning
/// `ControlFlow::Break` ends the scan early.
pub type ScanVisitor<'v> = dyn FnMut(&[u8], &[u8]) -> Result<ControlFlow<()>, StoreError> + 'v;

/// Ordered byte-keyed storage.
///
/// Implementations must return scan results in ascending key order and must
/// not cache values between calls: every read observes the latest write.
pub trait KvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }

    /// Insert or overwrite the value at `key`.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Delete `key`. Deleting an absent key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError>;

    /// Visit every entry whose key starts with `prefix`, in key order.
    fn scan_prefix(&self, prefix: &[u8], visit: &mut ScanVisitor<'_>) -> Result<(), StoreError>;

    /// Apply every operation in `batch`, in order.
    ///
    /// The default applies operations one by one; transactional backends
    /// override it to commit the whole batch at once.
    fn write_batch(&mut self, batch: WriteBatch) -> Result<(), StoreError> {
        for op in batch.into_ops() {
            match op {
                BatchOp::Put { key, value } => self.put(&key, &value)?,
                BatchOp::Delete { key } => self.delete(&key)?,
            }
        }
        Ok(())
    }
}
