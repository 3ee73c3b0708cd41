//! Errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid account: {0}")]
    InvalidAccount(String),

    #[error("invalid denom: {0}")]
    InvalidDenom(String),

    #[error("invalid period for {name}: must be positive")]
    InvalidPeriod { name: &'static str },

    #[error("arithmetic overflow: {0}")]
    Overflow(String),
}
