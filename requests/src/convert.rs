//! Conversions between the value token and the stable / DAO asset.
//!
//! The exchange rate `r` is the number of stable units one value-token unit is
//! worth: `stable = r * value`, `value = stable / r`.

use rust_decimal::Decimal;

use exp_ledger::PriceOracle;
use exp_types::{decimal_from_amount, truncate_to_amount, Coin, ExpParams};

use crate::ConversionError;

/// Read the oracle rate, rejecting zero and negative values.
pub fn checked_rate<O: PriceOracle + ?Sized>(oracle: &O) -> Result<Decimal, ConversionError> {
    let rate = oracle.exchange_rate();
    if rate <= Decimal::ZERO {
        return Err(ConversionError::InvalidExchangeRate(rate));
    }
    Ok(rate)
}

/// Stable-asset value of a value-token coin.
pub fn stable_return(
    params: &ExpParams,
    rate: Decimal,
    coin: &Coin,
) -> Result<Decimal, ConversionError> {
    if coin.denom != params.denom {
        return Err(ConversionError::DenomMismatch {
            expected: params.denom.clone(),
            found: coin.denom.clone(),
        });
    }
    dao_token_value(rate, coin.amount)
}

/// `rate * amount`.
pub fn dao_token_value(rate: Decimal, amount: u128) -> Result<Decimal, ConversionError> {
    let amount = decimal_from_amount(amount)?;
    rate.checked_mul(amount)
        .ok_or_else(|| ConversionError::Overflow(format!("{rate} * {amount}")))
}

/// Value tokens that pay for `paid` stable units, rounded up to whole units.
///
/// Rounding up means a non-zero payout always consumes at least one value
/// token unit.
pub fn value_equivalent(paid: u128, rate: Decimal) -> Result<u128, ConversionError> {
    let paid = decimal_from_amount(paid)?;
    let tokens = paid
        .checked_div(rate)
        .ok_or_else(|| ConversionError::Overflow(format!("{paid} / {rate}")))?;
    Ok(truncate_to_amount(tokens.ceil())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use exp_nullables::NullOracle;
    use exp_types::Denom;
    use rust_decimal_macros::dec;

    #[test]
    fn non_positive_rates_are_rejected() {
        assert!(matches!(
            checked_rate(&NullOracle::new(Decimal::ZERO)),
            Err(ConversionError::InvalidExchangeRate(_))
        ));
        assert!(checked_rate(&NullOracle::new(dec!(-1))).is_err());
        assert_eq!(checked_rate(&NullOracle::new(dec!(2))).unwrap(), dec!(2));
    }

    #[test]
    fn stable_return_checks_denom() {
        let params = ExpParams::default();
        let coin = Coin::new(params.denom.clone(), 100);
        assert_eq!(stable_return(&params, dec!(2), &coin).unwrap(), dec!(200));

        let foreign = Coin::new(Denom::new("uatom").unwrap(), 100);
        assert!(matches!(
            stable_return(&params, dec!(2), &foreign),
            Err(ConversionError::DenomMismatch { .. })
        ));
    }

    #[test]
    fn value_equivalent_rounds_up() {
        assert_eq!(value_equivalent(80, dec!(2)).unwrap(), 40);
        assert_eq!(value_equivalent(81, dec!(2)).unwrap(), 41);
        assert_eq!(value_equivalent(1, dec!(2)).unwrap(), 1);
        assert_eq!(value_equivalent(100, dec!(3)).unwrap(), 34);
        assert_eq!(value_equivalent(9, dec!(0.3)).unwrap(), 30);
    }
}
