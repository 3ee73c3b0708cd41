//! EXP request lifecycle engine.
//!
//! Members ask to convert value tokens into the pooled stable asset (burn
//! requests) or to receive value tokens for DAO-asset contributions (mint
//! requests). Each request is stored under a key derived from its status and
//! account and is advanced one execution step at a time:
//!
//! - [`RequestIndex`]: status-bucketed persistence of request records
//! - [`BurnEngine`]: partial / full settlement of burn requests
//! - [`MintEngine`]: finalisation of mint requests
//! - [`expiry`]: request age checks
//! - [`submit`]: creating and funding requests
//!
//! Every function takes the store handle from its caller; nothing here holds
//! a database or caches records between calls.

pub mod burn;
pub mod convert;
pub mod error;
pub mod expiry;
pub mod index;
pub mod mint;
pub mod submit;

pub use burn::{BurnEngine, BurnOutcome};
pub use convert::{checked_rate, dao_token_value, stable_return, value_equivalent};
pub use error::{BurnError, ConversionError, MintError, SubmitError};
pub use expiry::{burn_request_expired, expire, is_expired, mint_request_expired};
pub use index::{BurnIndex, MintIndex, RequestIndex};
pub use mint::{MintEngine, MintOutcome};
pub use submit::{credit_mint, submit_burn, submit_mint, CreditReceipt};
