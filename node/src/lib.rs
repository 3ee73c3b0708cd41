//! EXP request host.
//!
//! Wires the request engines to real infrastructure:
//! - [`NodeConfig`]: TOML configuration, including module parameters
//! - [`init_logging`]: human or JSON structured logs
//! - [`NodeMetrics`]: Prometheus counters per block
//! - [`RequestProcessor`]: the per-block burn and mint passes
//! - [`ExpNode`]: LMDB-backed storage plus the processor

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod node;
pub mod processor;
pub mod tracing_spans;

pub use config::NodeConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use metrics::NodeMetrics;
pub use node::ExpNode;
pub use processor::{BlockSummary, RequestProcessor};
