//! Mint request finalisation.
//!
//! A mint request collects DAO-asset contributions while Pending (see
//! [`crate::submit::credit_mint`]). Executing it is a one-shot settlement:
//! whatever value token has been credited is minted and the request closes.
//! An unfunded remainder is abandoned, the request never returns to Pending.
//! Credit beyond `max_coin_mint` is forfeited: the cap is minted and the
//! request closes as Expired.

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use exp_ledger::Ledger;
use exp_store::KvStore;
use exp_types::{truncate_to_amount, Coin, ExpParams, MintRequest, RequestStatus};

use crate::{ConversionError, MintError, MintIndex};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MintOutcome {
    /// Nothing was credited; the request moved to NoFunds.
    NoFunds,
    /// Fully funded; `minted` value tokens were credited to the member.
    Completed { minted: u128 },
    /// Partially funded; `abandoned` DAO-asset value was left unfunded.
    Expired { minted: u128, abandoned: Decimal },
    /// Credited beyond `max_coin_mint`; the cap was minted, the rest
    /// forfeited and the request moved to Expired.
    Capped { minted: u128, forfeited: u128 },
}

/// Finalises mint requests against a ledger.
pub struct MintEngine<'a, L: Ledger> {
    ledger: &'a mut L,
    params: &'a ExpParams,
}

impl<'a, L: Ledger> MintEngine<'a, L> {
    pub fn new(ledger: &'a mut L, params: &'a ExpParams) -> Self {
        Self { ledger, params }
    }

    pub fn execute<S: KvStore + ?Sized>(
        &mut self,
        store: &mut S,
        mut request: MintRequest,
    ) -> Result<MintOutcome, MintError> {
        if request.status != RequestStatus::Pending {
            return Err(MintError::NotPending(request.status));
        }

        if request.minted_value_token.is_zero() {
            MintIndex::transition(store, &mut request, RequestStatus::NoFunds)?;
            info!(account = %request.account, "mint request had no funds");
            return Ok(MintOutcome::NoFunds);
        }

        let max_token =
            truncate_to_amount(request.minted_value_token).map_err(ConversionError::from)?;
        let cap = u128::from(self.params.max_coin_mint);
        if max_token > cap {
            let coin = Coin::new(self.params.denom.clone(), cap);
            self.ledger.register_eligible(&request.account, &coin)?;
            self.ledger.mint_to_account(&request.account, &coin)?;
            MintIndex::transition(store, &mut request, RequestStatus::Expired)?;
            let forfeited = max_token - cap;
            warn!(
                account = %request.account,
                minted = cap,
                forfeited,
                "mint request exceeded the per-request cap"
            );
            return Ok(MintOutcome::Capped {
                minted: cap,
                forfeited,
            });
        }

        if max_token > 0 {
            let coin = Coin::new(self.params.denom.clone(), max_token);
            self.ledger.register_eligible(&request.account, &coin)?;
            self.ledger.mint_to_account(&request.account, &coin)?;
        } else {
            debug!(
                account = %request.account,
                credited = %request.minted_value_token,
                "credited value truncates to zero, nothing minted"
            );
        }

        let abandoned = request.remaining_dao_value;
        if abandoned.is_zero() {
            MintIndex::transition(store, &mut request, RequestStatus::Complete)?;
            info!(account = %request.account, minted = max_token, "mint request complete");
            Ok(MintOutcome::Completed { minted: max_token })
        } else {
            MintIndex::transition(store, &mut request, RequestStatus::Expired)?;
            info!(
                account = %request.account,
                minted = max_token,
                %abandoned,
                "mint request expired with unfunded remainder"
            );
            Ok(MintOutcome::Expired {
                minted: max_token,
                abandoned,
            })
        }
    }
}
