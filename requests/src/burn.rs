//! Burn request execution.
//!
//! One call to [`BurnEngine::execute`] settles as much of a pending burn
//! request as the module's pooled stable asset allows:
//!
//! 1. Nothing left to burn: the request moves to Complete.
//! 2. Pool empty: no change, retried next pass.
//! 3. Pool short of the owed amount: the whole pool is paid out and the
//!    value token equivalent of the payout (rounded up) is burned. The
//!    request stays Pending with a smaller remainder, or moves to Complete
//!    if the rounding consumed the whole remainder.
//! 4. Pool covers the owed amount, including a pool exactly equal to it: the
//!    owed amount is paid out, the whole remainder is burned and the request
//!    moves to Complete.
//!
//! The member's value-token balance is checked before any payout, and ledger
//! calls come before any store write, so a ledger failure leaves the stored
//! record exactly as it was.

use tracing::{debug, info};

use exp_ledger::{Ledger, LedgerError, PriceOracle};
use exp_store::KvStore;
use exp_types::{truncate_to_amount, BurnRequest, Coin, ExpParams, RequestStatus};

use crate::convert::{checked_rate, stable_return, value_equivalent};
use crate::{BurnError, BurnIndex, ConversionError};

/// What a single execution step did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BurnOutcome {
    /// The request reached Complete.
    Completed { paid: u128, burned: u128 },
    /// The pool was drained; the request stays Pending.
    PartiallyFilled {
        paid: u128,
        burned: u128,
        remaining: u128,
    },
    /// The pool held nothing; the request was not touched.
    NoPoolFunds,
}

/// Executes burn requests against a ledger and a price oracle.
pub struct BurnEngine<'a, L: Ledger, O: PriceOracle> {
    ledger: &'a mut L,
    oracle: &'a O,
    params: &'a ExpParams,
}

impl<'a, L: Ledger, O: PriceOracle> BurnEngine<'a, L, O> {
    pub fn new(ledger: &'a mut L, oracle: &'a O, params: &'a ExpParams) -> Self {
        Self {
            ledger,
            oracle,
            params,
        }
    }

    /// Run one execution step for `request`.
    pub fn execute<S: KvStore + ?Sized>(
        &mut self,
        store: &mut S,
        mut request: BurnRequest,
    ) -> Result<BurnOutcome, BurnError> {
        if request.status != RequestStatus::Pending {
            return Err(BurnError::NotPending(request.status));
        }

        let remaining = match request.remaining_burn_amount.clone() {
            Some(coin) if !coin.is_zero() => coin,
            _ => {
                request.remaining_burn_amount = None;
                BurnIndex::transition(store, &mut request, RequestStatus::Complete)?;
                info!(account = %request.account, "burn request had nothing left, marked complete");
                return Ok(BurnOutcome::Completed { paid: 0, burned: 0 });
            }
        };

        let rate = checked_rate(self.oracle)?;
        let owed = truncate_to_amount(stable_return(self.params, rate, &remaining)?)
            .map_err(ConversionError::from)?;

        let stable_denom = &self.params.ibc_asset_denom;
        let pooled = self.ledger.module_balance(stable_denom)?;
        if pooled == 0 {
            debug!(account = %request.account, owed, "module pool is empty, burn deferred");
            return Ok(BurnOutcome::NoPoolFunds);
        }

        if owed > pooled {
            let burned = value_equivalent(pooled, rate)?.min(remaining.amount);
            self.ensure_holds(&request, &remaining.with_amount(burned))?;
            self.ledger
                .transfer_from_module(&request.account, &Coin::new(stable_denom.clone(), pooled))?;
            self.ledger
                .burn_from_account(&request.account, &remaining.with_amount(burned))?;

            let left = remaining.amount - burned;
            if left == 0 {
                request.remaining_burn_amount = None;
                BurnIndex::transition(store, &mut request, RequestStatus::Complete)?;
                info!(
                    account = %request.account,
                    paid = pooled,
                    burned,
                    "pool payout consumed the whole remainder, burn request complete"
                );
                return Ok(BurnOutcome::Completed {
                    paid: pooled,
                    burned,
                });
            }
            request.remaining_burn_amount = Some(remaining.with_amount(left));
            BurnIndex::put(store, &request)?;

            debug!(
                account = %request.account,
                paid = pooled,
                burned,
                remaining = left,
                "burn request partially filled"
            );
            return Ok(BurnOutcome::PartiallyFilled {
                paid: pooled,
                burned,
                remaining: left,
            });
        }

        self.ensure_holds(&request, &remaining)?;
        if owed > 0 {
            self.ledger
                .transfer_from_module(&request.account, &Coin::new(stable_denom.clone(), owed))?;
        }
        self.ledger.burn_from_account(&request.account, &remaining)?;

        request.remaining_burn_amount = None;
        BurnIndex::transition(store, &mut request, RequestStatus::Complete)?;

        info!(
            account = %request.account,
            paid = owed,
            burned = remaining.amount,
            "burn request complete"
        );
        Ok(BurnOutcome::Completed {
            paid: owed,
            burned: remaining.amount,
        })
    }

    /// Fail before any payout if the member cannot cover the burn.
    fn ensure_holds(&self, request: &BurnRequest, coin: &Coin) -> Result<(), BurnError> {
        let held = self.ledger.balance_of(&request.account, &coin.denom)?;
        if held < coin.amount {
            return Err(LedgerError::InsufficientFunds {
                account: request.account.to_string(),
                needed: coin.amount,
                available: held,
            }
            .into());
        }
        Ok(())
    }
}
