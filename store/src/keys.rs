//! Store key schema for request records.
//!
//! ```text
//! collection prefix (1 byte) ++ status byte (1 byte) ++ account bytes
//! ```
//!
//! A scan over `collection prefix ++ status byte` walks a single status
//! bucket; a scan over the collection prefix alone walks the whole collection.
//! Re-keying on a status change is therefore a delete of the old key plus a put
//! of the new one.

use exp_types::{AccountId, RequestKind, RequestStatus};

/// Prefix shared by every record of one request kind.
pub fn collection_prefix(kind: RequestKind) -> Vec<u8> {
    vec![kind.prefix()]
}

/// Prefix of one status bucket.
pub fn status_prefix(kind: RequestKind, status: RequestStatus) -> Vec<u8> {
    vec![kind.prefix(), status.as_byte()]
}

/// Full key of a record.
pub fn request_key(kind: RequestKind, status: RequestStatus, account: &AccountId) -> Vec<u8> {
    let account = account.as_bytes();
    let mut key = Vec::with_capacity(2 + account.len());
    key.push(kind.prefix());
    key.push(status.as_byte());
    key.extend_from_slice(account);
    key
}

/// Split a key back into `(status, account bytes)`.
///
/// Returns `None` when the key does not belong to `kind` or carries an
/// unknown status byte.
pub fn decode_request_key(kind: RequestKind, key: &[u8]) -> Option<(RequestStatus, &[u8])> {
    match key {
        [prefix, status, account @ ..] if *prefix == kind.prefix() && !account.is_empty() => {
            RequestStatus::from_byte(*status).map(|s| (s, account))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_layout() {
        let account = AccountId::new("craft1abc").unwrap();
        let key = request_key(RequestKind::Burn, RequestStatus::Complete, &account);
        assert_eq!(key[0], RequestKind::Burn.prefix());
        assert_eq!(key[1], RequestStatus::Complete.as_byte());
        assert_eq!(&key[2..], b"craft1abc");
        assert!(key.starts_with(&status_prefix(RequestKind::Burn, RequestStatus::Complete)));
        assert!(key.starts_with(&collection_prefix(RequestKind::Burn)));
        assert!(!key.starts_with(&collection_prefix(RequestKind::Mint)));
    }

    #[test]
    fn decode_inverts_encode() {
        let account = AccountId::new("craft1abc").unwrap();
        for status in RequestStatus::ALL {
            let key = request_key(RequestKind::Mint, status, &account);
            let (decoded, bytes) = decode_request_key(RequestKind::Mint, &key).unwrap();
            assert_eq!(decoded, status);
            assert_eq!(bytes, account.as_bytes());
        }
    }

    #[test]
    fn decode_rejects_foreign_keys() {
        assert!(decode_request_key(RequestKind::Burn, &[RequestKind::Mint.prefix(), 0x01, b'a']).is_none());
        assert!(decode_request_key(RequestKind::Burn, &[RequestKind::Burn.prefix(), 0x7f, b'a']).is_none());
        assert!(decode_request_key(RequestKind::Burn, &[RequestKind::Burn.prefix(), 0x01]).is_none());
    }
}
