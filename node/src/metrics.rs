//! Prometheus metrics for the EXP request host.
//!
//! [`NodeMetrics`] owns a dedicated [`Registry`] so several processors (or
//! tests) can run in one process without clashing on the default registry.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge,
    Opts, Registry, TextEncoder,
};

use crate::processor::BlockSummary;
use crate::NodeError;

/// Central collection of request-processing metrics.
pub struct NodeMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    pub blocks_processed: IntCounter,
    pub burns_completed: IntCounter,
    pub burns_partially_filled: IntCounter,
    /// Burn steps skipped because the module pool was empty.
    pub burns_deferred: IntCounter,
    pub burns_expired: IntCounter,
    pub mints_completed: IntCounter,
    pub mints_no_funds: IntCounter,
    pub mints_expired: IntCounter,
    pub mints_capped: IntCounter,
    /// Steps discarded after a ledger failure; the request is retried later.
    pub ledger_failures: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Pending burn requests seen at the start of the last block.
    pub pending_burns: IntGauge,
    /// Pending mint requests seen at the start of the last block.
    pub pending_mints: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    pub block_process_time_ms: Histogram,
}

fn counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter, prometheus::Error> {
    register_int_counter_with_registry!(Opts::new(name, help), registry)
}

fn gauge(registry: &Registry, name: &str, help: &str) -> Result<IntGauge, prometheus::Error> {
    register_int_gauge_with_registry!(Opts::new(name, help), registry)
}

impl NodeMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let blocks_processed = counter(
            &registry,
            "exp_blocks_processed_total",
            "Blocks whose request passes ran to completion",
        )?;
        let burns_completed = counter(
            &registry,
            "exp_burns_completed_total",
            "Burn requests settled in full",
        )?;
        let burns_partially_filled = counter(
            &registry,
            "exp_burns_partially_filled_total",
            "Burn steps that drained the pool without settling the request",
        )?;
        let burns_deferred = counter(
            &registry,
            "exp_burns_deferred_total",
            "Burn steps skipped because the pool was empty",
        )?;
        let burns_expired = counter(
            &registry,
            "exp_burns_expired_total",
            "Burn requests force-expired",
        )?;
        let mints_completed = counter(
            &registry,
            "exp_mints_completed_total",
            "Mint requests finalised fully funded",
        )?;
        let mints_no_funds = counter(
            &registry,
            "exp_mints_no_funds_total",
            "Mint requests finalised without any contribution",
        )?;
        let mints_expired = counter(
            &registry,
            "exp_mints_expired_total",
            "Mint requests finalised with an abandoned remainder",
        )?;
        let ledger_failures = counter(
            &registry,
            "exp_ledger_failures_total",
            "Execution steps discarded after a ledger failure",
        )?;
        let mints_capped = counter(
            &registry,
            "exp_mints_capped_total",
            "Mint requests closed at the per-request mint cap",
        )?;

        let pending_burns = gauge(&registry, "exp_pending_burns", "Pending burn requests")?;
        let pending_mints = gauge(&registry, "exp_pending_mints", "Pending mint requests")?;

        // 0.1 ms → ~1.6 s.
        let block_process_time_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "exp_block_process_time_ms",
                "Request processing time per block in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(0.1, 2.0, 15)?),
            registry
        )?;

        Ok(Self {
            registry,
            blocks_processed,
            burns_completed,
            burns_partially_filled,
            burns_deferred,
            burns_expired,
            mints_completed,
            mints_no_funds,
            mints_expired,
            mints_capped,
            ledger_failures,
            pending_burns,
            pending_mints,
            block_process_time_ms,
        })
    }

    /// Fold one block's summary into the counters.
    pub fn record(&self, summary: &BlockSummary, elapsed_ms: f64) {
        self.blocks_processed.inc();
        self.burns_completed.inc_by(summary.burns_completed as u64);
        self.burns_partially_filled
            .inc_by(summary.burns_partially_filled as u64);
        self.burns_deferred.inc_by(summary.burns_deferred as u64);
        self.burns_expired.inc_by(summary.burns_expired as u64);
        self.mints_completed.inc_by(summary.mints_completed as u64);
        self.mints_no_funds.inc_by(summary.mints_no_funds as u64);
        self.mints_expired.inc_by(summary.mints_expired as u64);
        self.mints_capped.inc_by(summary.mints_capped as u64);
        self.ledger_failures.inc_by(summary.ledger_failures as u64);
        self.pending_burns.set(summary.pending_burns as i64);
        self.pending_mints.set(summary.pending_mints as i64);
        self.block_process_time_ms.observe(elapsed_ms);
    }

    /// Render every metric in the Prometheus text exposition format.
    pub fn encode_text(&self) -> Result<String, NodeError> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| NodeError::Fatal(format!("metrics encoding: {e}")))
    }
}
