//! Per-block request processing.
//!
//! Each block the host runs two passes over the Pending buckets:
//!
//! 1. Burn pass: stale requests are expired, the rest get one
//!    [`BurnEngine`] step.
//! 2. Mint pass: fully funded or stale requests are finalised by the
//!    [`MintEngine`]. Requests still collecting contributions are left alone.
//!
//! Every step runs inside its own [`CachedStore`]. A successful step is
//! committed; a failed one is dropped, so the stored record is exactly as it
//! was before the step.

use std::ops::ControlFlow;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use exp_ledger::{Ledger, PriceOracle};
use exp_requests::{
    burn_request_expired, expire, mint_request_expired, BurnEngine, BurnError, BurnOutcome,
    MintEngine, MintError, MintOutcome, RequestIndex,
};
use exp_store::{CachedStore, KvStore, StoreError};
use exp_types::{BurnRequest, ExpParams, MintRequest, Request, RequestStatus, Timestamp};

use crate::tracing_spans::{block_span, request_step_span};
use crate::{NodeError, NodeMetrics};

/// What one block of request processing did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockSummary {
    pub pending_burns: usize,
    pub pending_mints: usize,
    pub burns_completed: usize,
    pub burns_partially_filled: usize,
    pub burns_deferred: usize,
    pub burns_expired: usize,
    pub mints_completed: usize,
    pub mints_no_funds: usize,
    pub mints_expired: usize,
    /// Mint requests closed as Expired after hitting `max_coin_mint`.
    pub mints_capped: usize,
    pub ledger_failures: usize,
}

impl BlockSummary {
    /// Number of requests that reached a terminal status this block.
    pub fn finalised(&self) -> usize {
        self.burns_completed
            + self.burns_expired
            + self.mints_completed
            + self.mints_no_funds
            + self.mints_expired
            + self.mints_capped
    }
}

/// Drives the request engines once per block.
pub struct RequestProcessor {
    params: ExpParams,
    max_requests_per_block: usize,
    metrics: Option<NodeMetrics>,
}

impl RequestProcessor {
    pub fn new(params: ExpParams, max_requests_per_block: usize) -> Self {
        Self {
            params,
            max_requests_per_block,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: NodeMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn params(&self) -> &ExpParams {
        &self.params
    }

    pub fn metrics(&self) -> Option<&NodeMetrics> {
        self.metrics.as_ref()
    }

    /// Run the burn pass then the mint pass.
    ///
    /// Ledger failures only discard the affected step. Corrupted storage
    /// aborts the block with [`NodeError::Fatal`]; any other error aborts it
    /// and propagates, leaving steps committed so far in place.
    pub fn process_block<S, L, O>(
        &self,
        store: &mut S,
        ledger: &mut L,
        oracle: &O,
        now: Timestamp,
    ) -> Result<BlockSummary, NodeError>
    where
        S: KvStore,
        L: Ledger,
        O: PriceOracle,
    {
        let _span = block_span(now).entered();
        let started = Instant::now();
        let mut summary = BlockSummary::default();

        self.burn_pass(store, ledger, oracle, now, &mut summary)?;
        self.mint_pass(store, ledger, now, &mut summary)?;

        if let Some(metrics) = &self.metrics {
            metrics.record(&summary, started.elapsed().as_secs_f64() * 1_000.0);
        }
        info!(
            finalised = summary.finalised(),
            partial = summary.burns_partially_filled,
            ledger_failures = summary.ledger_failures,
            "block processed"
        );
        Ok(summary)
    }

    fn burn_pass<S, L, O>(
        &self,
        store: &mut S,
        ledger: &mut L,
        oracle: &O,
        now: Timestamp,
        summary: &mut BlockSummary,
    ) -> Result<(), NodeError>
    where
        S: KvStore,
        L: Ledger,
        O: PriceOracle,
    {
        let pending = self.pending::<S, BurnRequest>(store).map_err(fatal_if_corrupt)?;
        summary.pending_burns = pending.len();

        for mut request in pending {
            let _span = request_step_span(BurnRequest::KIND, &request.account).entered();
            let mut step = CachedStore::new(store);

            if burn_request_expired(&self.params, &request, now) {
                if expire(&mut step, &mut request).map_err(fatal_if_corrupt)? {
                    step.commit().map_err(fatal_if_corrupt)?;
                    summary.burns_expired += 1;
                }
                continue;
            }

            match BurnEngine::new(ledger, oracle, &self.params).execute(&mut step, request) {
                Ok(outcome) => {
                    step.commit().map_err(fatal_if_corrupt)?;
                    match outcome {
                        BurnOutcome::Completed { .. } => summary.burns_completed += 1,
                        BurnOutcome::PartiallyFilled { .. } => summary.burns_partially_filled += 1,
                        BurnOutcome::NoPoolFunds => summary.burns_deferred += 1,
                    }
                }
                Err(BurnError::LedgerFailure(e)) => {
                    warn!(error = %e, "burn step discarded, retrying next block");
                    summary.ledger_failures += 1;
                }
                Err(e) if e.is_fatal() => return Err(NodeError::Fatal(e.to_string())),
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn mint_pass<S, L>(
        &self,
        store: &mut S,
        ledger: &mut L,
        now: Timestamp,
        summary: &mut BlockSummary,
    ) -> Result<(), NodeError>
    where
        S: KvStore,
        L: Ledger,
    {
        let pending = self.pending::<S, MintRequest>(store).map_err(fatal_if_corrupt)?;
        summary.pending_mints = pending.len();

        for request in pending {
            if !request.is_fully_funded() && !mint_request_expired(&self.params, &request, now) {
                debug!(account = %request.account, "mint request still collecting");
                continue;
            }
            let _span = request_step_span(MintRequest::KIND, &request.account).entered();
            let mut step = CachedStore::new(store);

            match MintEngine::new(ledger, &self.params).execute(&mut step, request) {
                Ok(outcome) => {
                    step.commit().map_err(fatal_if_corrupt)?;
                    match outcome {
                        MintOutcome::Completed { .. } => summary.mints_completed += 1,
                        MintOutcome::NoFunds => summary.mints_no_funds += 1,
                        MintOutcome::Expired { .. } => summary.mints_expired += 1,
                        MintOutcome::Capped { .. } => summary.mints_capped += 1,
                    }
                }
                Err(MintError::LedgerFailure(e)) => {
                    warn!(error = %e, "mint step discarded, retrying next block");
                    summary.ledger_failures += 1;
                }
                Err(e) if e.is_fatal() => return Err(NodeError::Fatal(e.to_string())),
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Collect up to `max_requests_per_block` Pending records in key order.
    fn pending<S: KvStore, R: Request>(&self, store: &S) -> Result<Vec<R>, StoreError> {
        let limit = self.max_requests_per_block;
        let mut records = Vec::new();
        RequestIndex::<R>::iterate(store, Some(RequestStatus::Pending), |record| {
            records.push(record);
            if records.len() >= limit {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;
        Ok(records)
    }
}

fn fatal_if_corrupt(e: StoreError) -> NodeError {
    if e.is_fatal() {
        error!(error = %e, "corrupted request storage");
        NodeError::Fatal(e.to_string())
    } else {
        NodeError::Store(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exp_nullables::{NullLedger, NullOracle, NullStore};
    use exp_requests::{submit_burn, submit_mint, BurnIndex, MintIndex};
    use exp_types::{AccountId, Coin, MintRequest};
    use rust_decimal_macros::dec;

    struct Harness {
        store: NullStore,
        ledger: NullLedger,
        oracle: NullOracle,
        processor: RequestProcessor,
        module: AccountId,
    }

    impl Harness {
        fn new(max_per_block: usize) -> Self {
            let params = ExpParams {
                burn_exp_period_secs: 100,
                close_pool_period_secs: 50,
                ..ExpParams::default()
            };
            let module = AccountId::new("exp_module").unwrap();
            Self {
                store: NullStore::new(),
                ledger: NullLedger::new(module.clone()),
                oracle: NullOracle::new(dec!(1)),
                processor: RequestProcessor::new(params, max_per_block),
                module,
            }
        }

        fn params(&self) -> ExpParams {
            self.processor.params().clone()
        }

        fn fund_pool(&mut self, amount: u128) {
            let denom = self.params().ibc_asset_denom;
            self.ledger.set_balance(&self.module, &denom, amount);
        }

        fn member_burn(&mut self, name: &str, amount: u128, at: u64) -> AccountId {
            let params = self.params();
            let account = AccountId::new(name).unwrap();
            self.ledger.set_balance(&account, &params.denom, amount);
            submit_burn(
                &mut self.store,
                &params,
                account.clone(),
                Coin::new(params.denom.clone(), amount),
                Timestamp::new(at),
            )
            .unwrap();
            account
        }

        fn run(&mut self, now: u64) -> Result<BlockSummary, NodeError> {
            self.processor.process_block(
                &mut self.store,
                &mut self.ledger,
                &self.oracle,
                Timestamp::new(now),
            )
        }
    }

    #[test]
    fn burn_pass_settles_and_expires() {
        let mut h = Harness::new(10);
        h.fund_pool(1_000);
        let fresh = h.member_burn("craft1fresh", 100, 90);
        let stale = h.member_burn("craft1stale", 100, 0);

        let summary = h.run(150).unwrap();

        assert_eq!(summary.pending_burns, 2);
        assert_eq!(summary.burns_completed, 1);
        assert_eq!(summary.burns_expired, 1);
        assert_eq!(
            BurnIndex::get_by_account(&h.store, &fresh).unwrap().status,
            RequestStatus::Complete
        );
        assert_eq!(
            BurnIndex::get_by_account(&h.store, &stale).unwrap().status,
            RequestStatus::Expired
        );
    }

    #[test]
    fn empty_pool_defers_burn() {
        let mut h = Harness::new(10);
        let member = h.member_burn("craft1member", 100, 0);

        let summary = h.run(10).unwrap();

        assert_eq!(summary.burns_deferred, 1);
        assert_eq!(
            BurnIndex::get_by_account(&h.store, &member).unwrap().status,
            RequestStatus::Pending
        );
    }

    #[test]
    fn ledger_failure_discards_step_and_retries() {
        let mut h = Harness::new(10);
        h.fund_pool(1_000);
        let member = h.member_burn("craft1member", 100, 0);
        h.ledger.fail_transfers(true);

        let summary = h.run(10).unwrap();
        assert_eq!(summary.ledger_failures, 1);
        let stored = BurnIndex::get_by_account(&h.store, &member).unwrap();
        assert_eq!(stored.status, RequestStatus::Pending);
        assert_eq!(stored.remaining(), 100);

        h.ledger.fail_transfers(false);
        let summary = h.run(20).unwrap();
        assert_eq!(summary.burns_completed, 1);
    }

    #[test]
    fn mint_pass_waits_for_funding_or_expiry() {
        let mut h = Harness::new(10);
        let funded = AccountId::new("craft1funded").unwrap();
        let collecting = AccountId::new("craft1collecting").unwrap();
        submit_mint(&mut h.store, collecting.clone(), dec!(10), Timestamp::new(0)).unwrap();
        let mut request = MintRequest::new(funded.clone(), dec!(0), Timestamp::new(0));
        request.minted_value_token = dec!(7);
        MintIndex::put(&mut h.store, &request).unwrap();

        let summary = h.run(10).unwrap();
        assert_eq!(summary.mints_completed, 1);
        assert_eq!(summary.pending_mints, 2);
        assert_eq!(h.ledger.balance_of(&funded, &h.params().denom).unwrap(), 7);
        assert_eq!(
            MintIndex::get_by_account(&h.store, &collecting).unwrap().status,
            RequestStatus::Pending
        );

        // Past the close-pool period the unfunded request is closed out.
        let summary = h.run(51).unwrap();
        assert_eq!(summary.mints_no_funds, 1);
        assert_eq!(
            MintIndex::get_by_account(&h.store, &collecting).unwrap().status,
            RequestStatus::NoFunds
        );
    }

    #[test]
    fn settled_burn_is_not_expired_later() {
        let mut h = Harness::new(10);
        h.fund_pool(100);
        let member = h.member_burn("craft1member", 100, 0);

        let summary = h.run(10).unwrap();
        assert_eq!(summary.burns_completed, 1);

        let summary = h.run(200).unwrap();
        assert_eq!(summary.pending_burns, 0);
        assert_eq!(summary.burns_expired, 0);
        let stored = BurnIndex::get_by_account(&h.store, &member).unwrap();
        assert_eq!(stored.status, RequestStatus::Complete);
        assert_eq!(stored.remaining_burn_amount, None);
        assert_eq!(
            h.ledger.balance_of(&member, &h.params().ibc_asset_denom).unwrap(),
            100
        );
    }

    #[test]
    fn over_cap_mint_is_closed_as_expired() {
        let mut h = Harness::new(10);
        let mut params = h.params();
        params.max_coin_mint = 50;
        h.processor = RequestProcessor::new(params, 10);
        let member = AccountId::new("craft1whale").unwrap();
        let mut request = MintRequest::new(member.clone(), dec!(0), Timestamp::new(0));
        request.minted_value_token = dec!(80);
        MintIndex::put(&mut h.store, &request).unwrap();

        let summary = h.run(10).unwrap();
        assert_eq!(summary.mints_capped, 1);
        assert_eq!(h.ledger.balance_of(&member, &h.params().denom).unwrap(), 50);
        assert_eq!(
            MintIndex::get_by_account(&h.store, &member).unwrap().status,
            RequestStatus::Expired
        );

        let summary = h.run(100).unwrap();
        assert_eq!(summary.pending_mints, 0);
        assert_eq!(h.ledger.mint_calls(), 1);
    }

    #[test]
    fn per_block_limit_is_respected() {
        let mut h = Harness::new(2);
        h.fund_pool(10_000);
        for name in ["craft1aaa", "craft1bbb", "craft1ccc"] {
            h.member_burn(name, 10, 0);
        }

        assert_eq!(h.run(1).unwrap().burns_completed, 2);
        assert_eq!(h.run(2).unwrap().burns_completed, 1);
    }

    #[test]
    fn corrupt_record_is_fatal() {
        let mut h = Harness::new(10);
        let member = h.member_burn("craft1member", 10, 0);
        let key = exp_store::keys::request_key(
            exp_types::RequestKind::Burn,
            RequestStatus::Pending,
            &member,
        );
        h.store.put(&key, b"garbage").unwrap();

        assert!(matches!(h.run(1), Err(NodeError::Fatal(_))));
    }

    #[test]
    fn metrics_follow_summaries() {
        let mut h = Harness::new(10);
        h.processor = RequestProcessor::new(h.params(), 10)
            .with_metrics(NodeMetrics::new().unwrap());
        h.member_burn("craft1member", 10, 0);

        h.run(500).unwrap();

        let metrics = h.processor.metrics().unwrap();
        assert_eq!(metrics.blocks_processed.get(), 1);
        assert_eq!(metrics.burns_expired.get(), 1);
    }
}
