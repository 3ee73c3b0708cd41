//! LMDB database integrity checks.
//!
//! Run on startup to detect corruption early, before the host begins
//! executing requests.

use std::path::Path;

use heed::types::Bytes;

use exp_store::keys::decode_request_key;
use exp_types::RequestKind;

use crate::environment::REQUESTS_DB;
use crate::{LmdbEnvironment, LmdbError};

/// Summary of an integrity check run.
#[derive(Debug, Default)]
pub struct IntegrityReport {
    pub total_entries: u64,
    pub burn_entries: u64,
    pub mint_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Walk every key of the requests database and check that it decodes under
/// the request key schema. Values are not decoded here; that happens on read.
pub fn check_integrity(env: &LmdbEnvironment) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport::default();

    let rtxn = env.env().read_txn()?;
    let db = env
        .env()
        .open_database::<Bytes, Bytes>(&rtxn, Some(REQUESTS_DB))?
        .ok_or(LmdbError::MissingDatabase(REQUESTS_DB))?;

    for result in db.iter(&rtxn)? {
        let (key, _) = result?;
        report.total_entries += 1;
        if decode_request_key(RequestKind::Burn, key).is_some() {
            report.burn_entries += 1;
        } else if decode_request_key(RequestKind::Mint, key).is_some() {
            report.mint_entries += 1;
        } else {
            report.errors.push(format!("unrecognised key {key:02x?}"));
        }
    }

    Ok(report)
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a fresh (nonexistent) directory. Returns an error
/// if the directory exists but `data.mdb` is missing, which suggests
/// corruption or misconfiguration.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(()); // Fresh start
    }
    let data_file = path.join("data.mdb");
    if !data_file.exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use exp_store::KvStore;

    #[test]
    fn fresh_directory_passes_preflight() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(check_data_dir(&dir.path().join("missing")).is_ok());
        // Exists but empty: no data.mdb.
        assert!(check_data_dir(dir.path()).is_err());
    }

    #[test]
    fn report_counts_collections_and_flags_strays() {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).expect("open");
        let mut store = env.kv_store();
        store.put(&[RequestKind::Burn.prefix(), 0x01, b'a'], b"x").unwrap();
        store.put(&[RequestKind::Mint.prefix(), 0x02, b'b'], b"y").unwrap();
        store.put(&[0xff, 0x01, b'c'], b"z").unwrap();

        let report = check_integrity(&env).expect("check");
        assert_eq!(report.total_entries, 3);
        assert_eq!(report.burn_entries, 1);
        assert_eq!(report.mint_entries, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(!report.is_healthy());
        assert!(check_data_dir(dir.path()).is_ok());
    }
}
