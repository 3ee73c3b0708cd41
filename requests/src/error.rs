//! Request-engine errors.

use rust_decimal::Decimal;
use thiserror::Error;

use exp_ledger::LedgerError;
use exp_store::StoreError;
use exp_types::{Denom, RequestStatus, TypesError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("denom mismatch: expected {expected}, got {found}")]
    DenomMismatch { expected: Denom, found: Denom },

    #[error("exchange rate must be positive, got {0}")]
    InvalidExchangeRate(Decimal),

    #[error("arithmetic overflow: {0}")]
    Overflow(String),
}

impl From<TypesError> for ConversionError {
    fn from(e: TypesError) -> Self {
        ConversionError::Overflow(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum BurnError {
    #[error("burn request is {0}, only pending requests execute")]
    NotPending(RequestStatus),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("ledger failure: {0}")]
    LedgerFailure(#[from] LedgerError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl BurnError {
    /// Corrupted storage; the host must stop rather than retry.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_fatal())
    }
}

#[derive(Debug, Error)]
pub enum MintError {
    #[error("mint request is {0}, only pending requests execute")]
    NotPending(RequestStatus),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("ledger failure: {0}")]
    LedgerFailure(#[from] LedgerError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl MintError {
    /// Corrupted storage; the host must stop rather than retry.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_fatal())
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("no pending {kind} for {account}")]
    NotFound { kind: &'static str, account: String },

    #[error("{account} already has a pending {kind}")]
    DuplicatePending { kind: &'static str, account: String },

    #[error("amount must be positive")]
    InvalidAmount,

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
