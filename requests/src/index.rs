//! Status-bucketed request index.
//!
//! Records live under `collection ++ status ++ account` (see
//! [`exp_store::keys`]). Changing a record's status moves it to another
//! bucket, which [`RequestIndex::transition`] does as one remove-then-put.
//! Stored bytes that fail to decode, or that decode to a record whose status
//! or account disagrees with its key, are reported as
//! [`StoreError::Corruption`].

use std::marker::PhantomData;
use std::ops::ControlFlow;

use tracing::{error, trace};

use exp_store::keys::{collection_prefix, decode_request_key, request_key, status_prefix};
use exp_store::{KvStore, StoreError};
use exp_types::{AccountId, BurnRequest, MintRequest, Request, RequestStatus};

/// Index over one request collection. All methods are associated functions
/// taking the store handle explicitly.
pub struct RequestIndex<R> {
    _marker: PhantomData<fn() -> R>,
}

pub type BurnIndex = RequestIndex<BurnRequest>;
pub type MintIndex = RequestIndex<MintRequest>;

impl<R: Request> RequestIndex<R> {
    /// Key of `record` under its current status.
    pub fn key_of(record: &R) -> Vec<u8> {
        request_key(R::KIND, record.status(), record.account())
    }

    /// Upsert `record` at the key of its current status. Other buckets are
    /// left untouched.
    pub fn put<S: KvStore + ?Sized>(store: &mut S, record: &R) -> Result<(), StoreError> {
        let bytes =
            bincode::serialize(record).map_err(|e| StoreError::Serialization(e.to_string()))?;
        store.put(&Self::key_of(record), &bytes)?;
        trace!(kind = R::KIND.name(), account = %record.account(), status = %record.status(), "stored request");
        Ok(())
    }

    /// Delete the key of `record`'s current status. Absent keys are ignored.
    pub fn remove<S: KvStore + ?Sized>(store: &mut S, record: &R) -> Result<(), StoreError> {
        store.delete(&Self::key_of(record))
    }

    /// Move `record` to the `next` bucket: delete its current key, update the
    /// status in place, write the new key.
    pub fn transition<S: KvStore + ?Sized>(
        store: &mut S,
        record: &mut R,
        next: RequestStatus,
    ) -> Result<(), StoreError> {
        Self::remove(store, record)?;
        record.set_status(next);
        Self::put(store, record)
    }

    /// Read the record stored at exactly `key`.
    pub fn get_by_key<S: KvStore + ?Sized>(store: &S, key: &[u8]) -> Result<R, StoreError> {
        match store.get(key)? {
            Some(bytes) => Self::decode(key, &bytes),
            None => Err(StoreError::NotFound(format!(
                "{} at {key:02x?}",
                R::KIND.name()
            ))),
        }
    }

    /// The record for `account` in one status bucket, if any.
    pub fn find<S: KvStore + ?Sized>(
        store: &S,
        status: RequestStatus,
        account: &AccountId,
    ) -> Result<Option<R>, StoreError> {
        let key = request_key(R::KIND, status, account);
        match store.get(&key)? {
            Some(bytes) => Self::decode(&key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Look `account` up across the buckets in the order Complete, NoFunds,
    /// Pending, Expired and return the first hit.
    pub fn get_by_account<S: KvStore + ?Sized>(
        store: &S,
        account: &AccountId,
    ) -> Result<R, StoreError> {
        for status in RequestStatus::LOOKUP_ORDER {
            if let Some(record) = Self::find(store, status, account)? {
                return Ok(record);
            }
        }
        Err(StoreError::NotFound(format!(
            "{} for {account}",
            R::KIND.name()
        )))
    }

    /// Visit records in key order, over one bucket or the whole collection.
    /// The callback returns `ControlFlow::Break` to stop early.
    pub fn iterate<S, F>(
        store: &S,
        status: Option<RequestStatus>,
        mut f: F,
    ) -> Result<(), StoreError>
    where
        S: KvStore + ?Sized,
        F: FnMut(R) -> ControlFlow<()>,
    {
        let prefix = match status {
            Some(status) => status_prefix(R::KIND, status),
            None => collection_prefix(R::KIND),
        };
        store.scan_prefix(&prefix, &mut |key, value| {
            let record = Self::decode(key, value)?;
            Ok(f(record))
        })
    }

    pub fn by_status<S: KvStore + ?Sized>(
        store: &S,
        status: RequestStatus,
    ) -> Result<Vec<R>, StoreError> {
        let mut records = Vec::new();
        Self::iterate(store, Some(status), |record| {
            records.push(record);
            ControlFlow::Continue(())
        })?;
        Ok(records)
    }

    pub fn all<S: KvStore + ?Sized>(store: &S) -> Result<Vec<R>, StoreError> {
        let mut records = Vec::new();
        Self::iterate(store, None, |record| {
            records.push(record);
            ControlFlow::Continue(())
        })?;
        Ok(records)
    }

    fn decode(key: &[u8], bytes: &[u8]) -> Result<R, StoreError> {
        let record: R = bincode::deserialize(bytes).map_err(|e| {
            error!(kind = R::KIND.name(), key = ?key, "undecodable request record");
            StoreError::corruption(key, e)
        })?;
        match decode_request_key(R::KIND, key) {
            Some((status, account))
                if status == record.status() && account == record.account().as_bytes() =>
            {
                Ok(record)
            }
            _ => {
                error!(kind = R::KIND.name(), key = ?key, "request record does not match its key");
                Err(StoreError::corruption(
                    key,
                    format!(
                        "holds {} record for {}",
                        record.status(),
                        record.account()
                    ),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exp_nullables::NullStore;
    use exp_types::{Coin, Denom, Timestamp};
    use rust_decimal_macros::dec;

    fn account(name: &str) -> AccountId {
        AccountId::new(name).unwrap()
    }

    fn burn(name: &str, amount: u128, status: RequestStatus) -> BurnRequest {
        BurnRequest {
            account: account(name),
            remaining_burn_amount: Some(Coin::new(Denom::new("uexp").unwrap(), amount)),
            requested_at: Timestamp::new(1_000),
            status,
        }
    }

    #[test]
    fn put_then_get_by_account() {
        let mut store = NullStore::new();
        let request = burn("alice", 100, RequestStatus::Pending);
        BurnIndex::put(&mut store, &request).unwrap();

        assert_eq!(BurnIndex::get_by_account(&store, &account("alice")).unwrap(), request);
    }

    #[test]
    fn missing_account_is_not_found() {
        let store = NullStore::new();
        assert!(matches!(
            BurnIndex::get_by_account(&store, &account("nobody")),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn lookup_prefers_complete_over_pending() {
        let mut store = NullStore::new();
        let pending = burn("alice", 100, RequestStatus::Pending);
        let complete = burn("alice", 5, RequestStatus::Complete);
        BurnIndex::put(&mut store, &pending).unwrap();
        BurnIndex::put(&mut store, &complete).unwrap();

        let found = BurnIndex::get_by_account(&store, &account("alice")).unwrap();
        assert_eq!(found.status, RequestStatus::Complete);
    }

    #[test]
    fn lookup_prefers_no_funds_over_pending_and_expired() {
        let mut store = NullStore::new();
        for status in [RequestStatus::Expired, RequestStatus::Pending, RequestStatus::NoFunds] {
            BurnIndex::put(&mut store, &burn("alice", 1, status)).unwrap();
        }
        let found = BurnIndex::get_by_account(&store, &account("alice")).unwrap();
        assert_eq!(found.status, RequestStatus::NoFunds);
    }

    #[test]
    fn transition_leaves_no_stale_key() {
        let mut store = NullStore::new();
        let mut request = burn("alice", 100, RequestStatus::Pending);
        BurnIndex::put(&mut store, &request).unwrap();

        BurnIndex::transition(&mut store, &mut request, RequestStatus::Complete).unwrap();

        assert!(BurnIndex::find(&store, RequestStatus::Pending, &account("alice"))
            .unwrap()
            .is_none());
        assert_eq!(
            BurnIndex::find(&store, RequestStatus::Complete, &account("alice")).unwrap(),
            Some(request)
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut store = NullStore::new();
        BurnIndex::remove(&mut store, &burn("ghost", 1, RequestStatus::Pending)).unwrap();
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn iterate_filters_by_bucket_and_stops_early() {
        let mut store = NullStore::new();
        BurnIndex::put(&mut store, &burn("alice", 1, RequestStatus::Pending)).unwrap();
        BurnIndex::put(&mut store, &burn("bob", 2, RequestStatus::Pending)).unwrap();
        BurnIndex::put(&mut store, &burn("carol", 3, RequestStatus::Complete)).unwrap();
        MintIndex::put(
            &mut store,
            &MintRequest::new(account("dave"), dec!(10), Timestamp::new(0)),
        )
        .unwrap();

        let pending = BurnIndex::by_status(&store, RequestStatus::Pending).unwrap();
        let names: Vec<_> = pending.iter().map(|r| r.account.as_str().to_string()).collect();
        assert_eq!(names, vec!["alice", "bob"]);

        assert_eq!(BurnIndex::all(&store).unwrap().len(), 3);
        assert_eq!(MintIndex::all(&store).unwrap().len(), 1);

        let mut seen = 0;
        BurnIndex::iterate(&store, None, |_| {
            seen += 1;
            ControlFlow::Break(())
        })
        .unwrap();
        assert_eq!(seen, 1);
    }

    #[test]
    fn garbage_bytes_are_corruption() {
        let mut store = NullStore::new();
        let key = request_key(
            exp_types::RequestKind::Burn,
            RequestStatus::Pending,
            &account("alice"),
        );
        store.put(&key, &[0xde, 0xad]).unwrap();

        let err = BurnIndex::by_status(&store, RequestStatus::Pending).unwrap_err();
        assert!(err.is_fatal());
        assert!(BurnIndex::get_by_account(&store, &account("alice"))
            .unwrap_err()
            .is_fatal());
    }

    #[test]
    fn record_under_wrong_bucket_is_corruption() {
        let mut store = NullStore::new();
        let request = burn("alice", 100, RequestStatus::Pending);
        let wrong_key = request_key(
            exp_types::RequestKind::Burn,
            RequestStatus::Complete,
            &account("alice"),
        );
        store
            .put(&wrong_key, &bincode::serialize(&request).unwrap())
            .unwrap();

        assert!(matches!(
            BurnIndex::get_by_key(&store, &wrong_key),
            Err(StoreError::Corruption(_))
        ));
    }
}
