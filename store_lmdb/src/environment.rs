//! LMDB environment setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use tracing::info;

use crate::{LmdbError, LmdbKvStore};

/// Name of the database holding every request record.
pub const REQUESTS_DB: &str = "requests";

/// Wraps the LMDB environment and its database handle.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    requests_db: Database<Bytes, Bytes>,
    path: PathBuf,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        let mut options = EnvOpenOptions::new();
        options.map_size(map_size).max_dbs(4);
        // SAFETY: the environment is opened once per path by this process and
        // never through a second `Env` handle.
        let env = unsafe { options.open(path)? };

        let mut wtxn = env.write_txn()?;
        let requests_db: Database<Bytes, Bytes> =
            env.create_database(&mut wtxn, Some(REQUESTS_DB))?;
        wtxn.commit()?;

        info!(path = %path.display(), map_size, "opened LMDB environment");
        Ok(Self {
            env: Arc::new(env),
            requests_db,
            path: path.to_path_buf(),
        })
    }

    /// A store handle over the requests database.
    pub fn kv_store(&self) -> LmdbKvStore {
        LmdbKvStore::new(Arc::clone(&self.env), self.requests_db)
    }

    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
