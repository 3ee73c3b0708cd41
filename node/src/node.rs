//! A running EXP request host: LMDB-backed request storage plus the
//! per-block processor.

use rust_decimal::Decimal;
use tracing::{error, info};

use exp_ledger::{Ledger, PriceOracle};
use exp_requests::{credit_mint, submit_burn, submit_mint, CreditReceipt};
use exp_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment, LmdbKvStore};
use exp_types::{AccountId, BurnRequest, Coin, MintRequest, Timestamp};

use crate::processor::{BlockSummary, RequestProcessor};
use crate::{NodeConfig, NodeError, NodeMetrics};

pub struct ExpNode {
    config: NodeConfig,
    env: LmdbEnvironment,
    processor: RequestProcessor,
}

impl ExpNode {
    /// Validate `config`, open the data directory and check it for
    /// corruption before any request is touched.
    pub fn open(config: NodeConfig) -> Result<Self, NodeError> {
        config.validate()?;
        check_data_dir(&config.data_dir).map_err(NodeError::Config)?;
        let env = LmdbEnvironment::open(&config.data_dir, config.map_size)?;

        let report = check_integrity(&env)?;
        if !report.is_healthy() {
            for problem in &report.errors {
                error!(%problem, "integrity check failed");
            }
            return Err(NodeError::Fatal(format!(
                "{} corrupt entries in {}",
                report.errors.len(),
                config.data_dir.display()
            )));
        }
        info!(
            burns = report.burn_entries,
            mints = report.mint_entries,
            "request store opened"
        );

        let mut processor =
            RequestProcessor::new(config.params.clone(), config.max_requests_per_block);
        if config.enable_metrics {
            processor = processor.with_metrics(NodeMetrics::new()?);
        }

        Ok(Self {
            config,
            env,
            processor,
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn processor(&self) -> &RequestProcessor {
        &self.processor
    }

    /// A fresh handle over the request database.
    pub fn store(&self) -> LmdbKvStore {
        self.env.kv_store()
    }

    pub fn submit_burn(
        &self,
        account: AccountId,
        coin: Coin,
        now: Timestamp,
    ) -> Result<BurnRequest, NodeError> {
        let mut store = self.store();
        Ok(submit_burn(
            &mut store,
            &self.config.params,
            account,
            coin,
            now,
        )?)
    }

    pub fn submit_mint(
        &self,
        account: AccountId,
        dao_value: Decimal,
        now: Timestamp,
    ) -> Result<MintRequest, NodeError> {
        let mut store = self.store();
        Ok(submit_mint(&mut store, account, dao_value, now)?)
    }

    pub fn credit_mint<O: PriceOracle>(
        &self,
        oracle: &O,
        account: &AccountId,
        dao_coin: &Coin,
    ) -> Result<CreditReceipt, NodeError> {
        let mut store = self.store();
        Ok(credit_mint(
            &mut store,
            oracle,
            &self.config.params,
            account,
            dao_coin,
        )?)
    }

    /// Run one block of request processing against the LMDB store.
    pub fn process_block<L: Ledger, O: PriceOracle>(
        &self,
        ledger: &mut L,
        oracle: &O,
        now: Timestamp,
    ) -> Result<BlockSummary, NodeError> {
        let mut store = self.store();
        self.processor.process_block(&mut store, ledger, oracle, now)
    }
}
