//! The asset ledger collaborator.

use exp_types::{AccountId, Coin, Denom};

use crate::LedgerError;

/// Account balances plus the transfer, mint and burn primitives.
///
/// Every mutating call either applies completely or returns an error and
/// changes nothing.
pub trait Ledger {
    /// The module account that holds the pooled stable asset.
    fn module_account(&self) -> &AccountId;

    fn balance_of(&self, account: &AccountId, denom: &Denom) -> Result<u128, LedgerError>;

    /// Move `coin` from the module account to `to`.
    fn transfer_from_module(&mut self, to: &AccountId, coin: &Coin) -> Result<(), LedgerError>;

    /// Destroy `coin` held by `account`.
    fn burn_from_account(&mut self, account: &AccountId, coin: &Coin) -> Result<(), LedgerError>;

    /// Create `coin` and credit it to `account`.
    fn mint_to_account(&mut self, account: &AccountId, coin: &Coin) -> Result<(), LedgerError>;

    /// Allow `account` to receive minted tokens up to `cap`.
    fn register_eligible(&mut self, account: &AccountId, cap: &Coin) -> Result<(), LedgerError>;

    /// Pooled balance of the module account.
    fn module_balance(&self, denom: &Denom) -> Result<u128, LedgerError> {
        self.balance_of(self.module_account(), denom)
    }
}
