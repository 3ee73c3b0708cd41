//! Fundamental types for the EXP request engine.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account and denomination identifiers, coins, timestamps, module parameters,
//! request status and the burn/mint request records themselves.

pub mod address;
pub mod amount;
pub mod error;
pub mod params;
pub mod request;
pub mod state;
pub mod time;

pub use address::{AccountId, Denom};
pub use amount::{decimal_from_amount, truncate_to_amount, Coin};
pub use error::TypesError;
pub use params::ExpParams;
pub use request::{BurnRequest, MintRequest, Request, RequestKind};
pub use state::RequestStatus;
pub use time::Timestamp;
