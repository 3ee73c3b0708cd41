use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient funds on {account}: need {needed}, have {available}")]
    InsufficientFunds {
        account: String,
        needed: u128,
        available: u128,
    },

    #[error("account {0} is not eligible to receive minted tokens")]
    NotEligible(String),

    #[error("ledger rejected the operation: {0}")]
    Rejected(String),
}
