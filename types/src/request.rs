//! Burn and mint request records.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{AccountId, Coin, RequestStatus, Timestamp};

/// Which request collection a record belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Burn,
    Mint,
}

impl RequestKind {
    /// Leading byte of every store key in this collection.
    pub fn prefix(&self) -> u8 {
        match self {
            Self::Burn => 0x10,
            Self::Mint => 0x11,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Burn => "burn_request",
            Self::Mint => "mint_request",
        }
    }
}

/// Common view over request records, used by the status-bucketed index.
pub trait Request: Clone + Serialize + DeserializeOwned {
    const KIND: RequestKind;

    fn account(&self) -> &AccountId;
    fn status(&self) -> RequestStatus;
    fn set_status(&mut self, status: RequestStatus);
    fn requested_at(&self) -> Timestamp;
}

/// A member's request to convert value tokens into the stable asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnRequest {
    pub account: AccountId,
    /// Value tokens still to be converted. `None` once fully resolved.
    pub remaining_burn_amount: Option<Coin>,
    pub requested_at: Timestamp,
    pub status: RequestStatus,
}

impl BurnRequest {
    pub fn new(account: AccountId, amount: Coin, requested_at: Timestamp) -> Self {
        Self {
            account,
            remaining_burn_amount: Some(amount),
            requested_at,
            status: RequestStatus::Pending,
        }
    }

    /// Remaining amount in minimal units; zero when absent.
    pub fn remaining(&self) -> u128 {
        self.remaining_burn_amount.as_ref().map_or(0, |c| c.amount)
    }
}

impl Request for BurnRequest {
    const KIND: RequestKind = RequestKind::Burn;

    fn account(&self) -> &AccountId {
        &self.account
    }

    fn status(&self) -> RequestStatus {
        self.status
    }

    fn set_status(&mut self, status: RequestStatus) {
        self.status = status;
    }

    fn requested_at(&self) -> Timestamp {
        self.requested_at
    }
}

/// A member's request to mint value tokens against DAO-asset contributions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRequest {
    pub account: AccountId,
    /// DAO-asset value still owed before the request is fully funded.
    pub remaining_dao_value: Decimal,
    /// Value tokens credited so far, minted on finalisation.
    pub minted_value_token: Decimal,
    pub requested_at: Timestamp,
    pub status: RequestStatus,
}

impl MintRequest {
    pub fn new(account: AccountId, dao_value: Decimal, requested_at: Timestamp) -> Self {
        Self {
            account,
            remaining_dao_value: dao_value,
            minted_value_token: Decimal::ZERO,
            requested_at,
            status: RequestStatus::Pending,
        }
    }

    pub fn is_fully_funded(&self) -> bool {
        self.remaining_dao_value.is_zero()
    }
}

impl Request for MintRequest {
    const KIND: RequestKind = RequestKind::Mint;

    fn account(&self) -> &AccountId {
        &self.account
    }

    fn status(&self) -> RequestStatus {
        self.status
    }

    fn set_status(&mut self, status: RequestStatus) {
        self.status = status;
    }

    fn requested_at(&self) -> Timestamp {
        self.requested_at
    }
}
