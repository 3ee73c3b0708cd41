//! Request age checks.
//!
//! Nothing here runs on a timer. The driver asks on each pass whether a
//! Pending request has outlived its period and, if so, force-closes it.

use tracing::info;

use exp_store::{KvStore, StoreError};
use exp_types::{BurnRequest, ExpParams, MintRequest, Request, RequestStatus, Timestamp};

use crate::RequestIndex;

/// True iff `requested_at + period_secs < now`.
pub fn is_expired<R: Request>(request: &R, period_secs: u64, now: Timestamp) -> bool {
    request.requested_at().is_past(period_secs, now)
}

pub fn burn_request_expired(params: &ExpParams, request: &BurnRequest, now: Timestamp) -> bool {
    is_expired(request, params.burn_exp_period_secs, now)
}

/// Mint requests expire on `close_pool_period_secs`, the window in which
/// they may collect contributions, not on the burn period.
pub fn mint_request_expired(params: &ExpParams, request: &MintRequest, now: Timestamp) -> bool {
    is_expired(request, params.close_pool_period_secs, now)
}

/// Move a Pending request to Expired. Returns `false` and leaves the store
/// untouched when the request is already terminal.
pub fn expire<S, R>(store: &mut S, request: &mut R) -> Result<bool, StoreError>
where
    S: KvStore + ?Sized,
    R: Request,
{
    if !request.status().can_transition_to(RequestStatus::Expired) {
        return Ok(false);
    }
    RequestIndex::<R>::transition(store, request, RequestStatus::Expired)?;
    info!(kind = R::KIND.name(), account = %request.account(), "request expired");
    Ok(true)
}
