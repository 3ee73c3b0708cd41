//! Nullable price oracle: a fixed, settable exchange rate.

use exp_ledger::PriceOracle;
use rust_decimal::Decimal;
use std::cell::Cell;

pub struct NullOracle {
    rate: Cell<Decimal>,
}

impl NullOracle {
    pub fn new(rate: Decimal) -> Self {
        Self {
            rate: Cell::new(rate),
        }
    }

    pub fn set_rate(&self, rate: Decimal) {
        self.rate.set(rate);
    }
}

impl Default for NullOracle {
    fn default() -> Self {
        Self::new(Decimal::ONE)
    }
}

impl PriceOracle for NullOracle {
    fn exchange_rate(&self) -> Decimal {
        self.rate.get()
    }
}
