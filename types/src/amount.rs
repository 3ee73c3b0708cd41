//! Coin amounts and decimal conversion.
//!
//! On-chain amounts are integers in a denom's minimal unit (u128). Prices and
//! accrued values are `Decimal`s; the two helpers at the bottom of this module
//! are the only places where one is turned into the other.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Denom, TypesError};

/// An integer amount of a single denomination.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: Denom,
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: Denom, amount: u128) -> Self {
        Self { denom, amount }
    }

    pub fn zero(denom: Denom) -> Self {
        Self { denom, amount: 0 }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Same denom, different amount.
    pub fn with_amount(&self, amount: u128) -> Self {
        Self {
            denom: self.denom.clone(),
            amount,
        }
    }

    pub fn checked_sub(&self, amount: u128) -> Option<Self> {
        self.amount.checked_sub(amount).map(|a| self.with_amount(a))
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Lift an integer amount into a `Decimal`.
pub fn decimal_from_amount(amount: u128) -> Result<Decimal, TypesError> {
    Decimal::from_u128(amount)
        .ok_or_else(|| TypesError::Overflow(format!("{amount} does not fit a decimal")))
}

/// Drop the fractional part of a non-negative decimal, yielding minimal units.
pub fn truncate_to_amount(value: Decimal) -> Result<u128, TypesError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(TypesError::Overflow(format!("negative amount {value}")));
    }
    value
        .trunc()
        .to_u128()
        .ok_or_else(|| TypesError::Overflow(format!("{value} does not fit an amount")))
}
