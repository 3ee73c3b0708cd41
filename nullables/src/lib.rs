//! Nullable infrastructure for deterministic testing.
//!
//! Everything the request engines talk to (clock, storage, ledger, price
//! oracle) sits behind a trait. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod ledger;
pub mod oracle;
pub mod store;

pub use clock::NullClock;
pub use ledger::NullLedger;
pub use oracle::NullOracle;
pub use store::NullStore;
