//! Module parameters supplied by the config collaborator.
//!
//! Read-only to the request engine. Every period is expressed in seconds.

use serde::{Deserialize, Serialize};

use crate::{AccountId, Denom, TypesError};

/// Default close-pool, vesting and burn periods: one minute each. Genesis
/// files for a real network are expected to override them.
pub const DEFAULT_PERIOD_SECS: u64 = 60;

/// Parameters of the EXP module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpParams {
    /// Upper bound on value tokens minted for a single request.
    #[serde(default = "default_max_coin_mint")]
    pub max_coin_mint: u64,

    /// Account holding the DAO treasury.
    #[serde(default = "default_dao_account")]
    pub dao_account: AccountId,

    /// Denom of the value token.
    #[serde(default = "default_denom")]
    pub denom: Denom,

    /// Denom of the stable / DAO asset paid out on burns.
    #[serde(default = "default_ibc_asset_denom")]
    pub ibc_asset_denom: Denom,

    /// How long a mint request may collect DAO-asset contributions.
    #[serde(default = "default_period")]
    pub close_pool_period_secs: u64,

    /// End of the vesting window after which value tokens can no longer be burned.
    #[serde(default = "default_period")]
    pub vesting_period_end_secs: u64,

    /// How long a burn request may stay pending before it expires.
    #[serde(default = "default_period")]
    pub burn_exp_period_secs: u64,
}

fn default_max_coin_mint() -> u64 {
    10_000_000_000
}

fn default_dao_account() -> AccountId {
    AccountId::from_static("craft1hj5fveer5cjtn4wd6wstzugjfdxzl0xp86p9fl")
}

fn default_denom() -> Denom {
    Denom::from_static("uexp")
}

fn default_ibc_asset_denom() -> Denom {
    Denom::from_static("token")
}

fn default_period() -> u64 {
    DEFAULT_PERIOD_SECS
}

impl ExpParams {
    /// Check every field; the first violation is returned.
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.dao_account.as_str().is_empty() {
            return Err(TypesError::InvalidAccount("dao account must not be empty".into()));
        }
        self.denom.validate()?;
        self.ibc_asset_denom.validate()?;
        validate_period("close_pool_period_secs", self.close_pool_period_secs)?;
        validate_period("vesting_period_end_secs", self.vesting_period_end_secs)?;
        validate_period("burn_exp_period_secs", self.burn_exp_period_secs)?;
        Ok(())
    }
}

fn validate_period(name: &'static str, secs: u64) -> Result<(), TypesError> {
    if secs == 0 {
        return Err(TypesError::InvalidPeriod { name });
    }
    Ok(())
}

impl Default for ExpParams {
    fn default() -> Self {
        Self {
            max_coin_mint: default_max_coin_mint(),
            dao_account: default_dao_account(),
            denom: default_denom(),
            ibc_asset_denom: default_ibc_asset_denom(),
            close_pool_period_secs: default_period(),
            vesting_period_end_secs: default_period(),
            burn_exp_period_secs: default_period(),
        }
    }
}
