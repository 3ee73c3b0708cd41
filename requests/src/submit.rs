//! Creating and funding requests.
//!
//! These are the member-facing entry points. They only write Pending
//! records; every other status is reached through the engines or
//! [`crate::expire`].

use rust_decimal::Decimal;
use tracing::{debug, info};

use exp_ledger::PriceOracle;
use exp_store::KvStore;
use exp_types::{
    decimal_from_amount, AccountId, BurnRequest, Coin, ExpParams, MintRequest, Request,
    RequestStatus, Timestamp,
};

use crate::convert::checked_rate;
use crate::{BurnIndex, ConversionError, MintIndex, RequestIndex, SubmitError};

/// Result of crediting DAO asset to a pending mint request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreditReceipt {
    /// DAO-asset value absorbed by the request.
    pub applied: Decimal,
    /// Part of the contribution the request had no room for.
    pub excess: Decimal,
    /// The request as stored after crediting.
    pub request: MintRequest,
}

fn ensure_no_pending<S, R>(store: &S, account: &AccountId) -> Result<(), SubmitError>
where
    S: KvStore + ?Sized,
    R: Request,
{
    if RequestIndex::<R>::find(store, RequestStatus::Pending, account)?.is_some() {
        return Err(SubmitError::DuplicatePending {
            kind: R::KIND.name(),
            account: account.to_string(),
        });
    }
    Ok(())
}

/// Open a burn request for `coin`, which must be in the value-token denom.
pub fn submit_burn<S: KvStore + ?Sized>(
    store: &mut S,
    params: &ExpParams,
    account: AccountId,
    coin: Coin,
    now: Timestamp,
) -> Result<BurnRequest, SubmitError> {
    if coin.denom != params.denom {
        return Err(ConversionError::DenomMismatch {
            expected: params.denom.clone(),
            found: coin.denom,
        }
        .into());
    }
    if coin.is_zero() {
        return Err(SubmitError::InvalidAmount);
    }
    ensure_no_pending::<S, BurnRequest>(store, &account)?;

    let request = BurnRequest::new(account, coin, now);
    BurnIndex::put(store, &request)?;
    info!(account = %request.account, amount = request.remaining(), "burn request submitted");
    Ok(request)
}

/// Open a mint request asking for `dao_value` worth of DAO asset.
pub fn submit_mint<S: KvStore + ?Sized>(
    store: &mut S,
    account: AccountId,
    dao_value: Decimal,
    now: Timestamp,
) -> Result<MintRequest, SubmitError> {
    if dao_value <= Decimal::ZERO {
        return Err(SubmitError::InvalidAmount);
    }
    ensure_no_pending::<S, MintRequest>(store, &account)?;

    let request = MintRequest::new(account, dao_value, now);
    MintIndex::put(store, &request)?;
    info!(account = %request.account, %dao_value, "mint request submitted");
    Ok(request)
}

/// Apply a DAO-asset contribution to `account`'s pending mint request.
///
/// At most `remaining_dao_value` is absorbed; the value tokens it buys at the
/// current rate accumulate in `minted_value_token` until the request is
/// finalised.
pub fn credit_mint<S, O>(
    store: &mut S,
    oracle: &O,
    params: &ExpParams,
    account: &AccountId,
    dao_coin: &Coin,
) -> Result<CreditReceipt, SubmitError>
where
    S: KvStore + ?Sized,
    O: PriceOracle + ?Sized,
{
    if dao_coin.denom != params.ibc_asset_denom {
        return Err(ConversionError::DenomMismatch {
            expected: params.ibc_asset_denom.clone(),
            found: dao_coin.denom.clone(),
        }
        .into());
    }
    if dao_coin.is_zero() {
        return Err(SubmitError::InvalidAmount);
    }
    let rate = checked_rate(oracle)?;

    let mut request = MintIndex::find(store, RequestStatus::Pending, account)?.ok_or_else(|| {
        SubmitError::NotFound {
            kind: MintRequest::KIND.name(),
            account: account.to_string(),
        }
    })?;

    let offered = decimal_from_amount(dao_coin.amount).map_err(ConversionError::from)?;
    let applied = offered.min(request.remaining_dao_value);
    let excess = offered - applied;
    let bought = applied
        .checked_div(rate)
        .ok_or_else(|| ConversionError::Overflow(format!("{applied} / {rate}")))?;

    request.remaining_dao_value -= applied;
    request.minted_value_token = request
        .minted_value_token
        .checked_add(bought)
        .ok_or_else(|| ConversionError::Overflow(format!("minted + {bought}")))?;
    MintIndex::put(store, &request)?;

    debug!(
        %account,
        %applied,
        %excess,
        remaining = %request.remaining_dao_value,
        minted = %request.minted_value_token,
        "credited mint request"
    );
    Ok(CreditReceipt {
        applied,
        excess,
        request,
    })
}
