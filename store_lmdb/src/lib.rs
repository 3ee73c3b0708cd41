//! LMDB storage backend for EXP request records.
//!
//! Implements [`exp_store::KvStore`] on top of the `heed` LMDB bindings. All
//! request collections share one LMDB database; the key schema from
//! [`exp_store::keys`] keeps them apart.

pub mod environment;
pub mod error;
pub mod integrity;
pub mod kv;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use kv::LmdbKvStore;
