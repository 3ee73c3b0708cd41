//! Collaborator interfaces consumed by the request engines.
//!
//! The engines never move funds or price assets themselves. The host plugs in
//! a [`Ledger`] (balances, transfers, mint and burn on accounts) and a
//! [`PriceOracle`] (the value-token exchange rate).

pub mod error;
pub mod ledger;
pub mod oracle;

pub use error::LedgerError;
pub use ledger::Ledger;
pub use oracle::PriceOracle;
