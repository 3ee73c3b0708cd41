//! Abstract storage for the EXP request engine.
//!
//! The engine never owns a database. Every operation receives a store handle
//! implementing [`KvStore`] from its caller (LMDB in production, in-memory for
//! testing). This crate also fixes the key schema shared by every backend and
//! provides [`CachedStore`], the overlay the host uses to make one execution
//! step all-or-nothing.

pub mod batch;
pub mod cached;
pub mod error;
pub mod keys;
pub mod kv;

pub use batch::{BatchOp, WriteBatch};
pub use cached::CachedStore;
pub use error::StoreError;
pub use kv::{KvStore, ScanVisitor};
