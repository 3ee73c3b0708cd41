//! The price-oracle collaborator.

use rust_decimal::Decimal;

/// Supplies the value-token exchange rate: how many stable / DAO-asset units
/// one value-token unit is worth.
pub trait PriceOracle {
    fn exchange_rate(&self) -> Decimal;
}
