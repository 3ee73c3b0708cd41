//! Nullable ledger: in-memory balances with switchable failures.

use std::collections::HashMap;

use exp_ledger::{Ledger, LedgerError};
use exp_types::{AccountId, Coin, Denom};

/// An in-memory [`Ledger`].
///
/// Balances are keyed by `(account, denom)`. Minting only succeeds for
/// accounts registered as eligible, and only up to their registered cap.
pub struct NullLedger {
    module: AccountId,
    balances: HashMap<(AccountId, Denom), u128>,
    eligible: HashMap<AccountId, u128>,
    fail_transfers: bool,
    fail_burns: bool,
    fail_mints: bool,
    transfer_calls: usize,
    burn_calls: usize,
    mint_calls: usize,
}

impl NullLedger {
    pub fn new(module: AccountId) -> Self {
        Self {
            module,
            balances: HashMap::new(),
            eligible: HashMap::new(),
            fail_transfers: false,
            fail_burns: false,
            fail_mints: false,
            transfer_calls: 0,
            burn_calls: 0,
            mint_calls: 0,
        }
    }

    pub fn set_balance(&mut self, account: &AccountId, denom: &Denom, amount: u128) {
        self.balances
            .insert((account.clone(), denom.clone()), amount);
    }

    pub fn fail_transfers(&mut self, fail: bool) {
        self.fail_transfers = fail;
    }

    pub fn fail_burns(&mut self, fail: bool) {
        self.fail_burns = fail;
    }

    pub fn fail_mints(&mut self, fail: bool) {
        self.fail_mints = fail;
    }

    pub fn is_eligible(&self, account: &AccountId) -> bool {
        self.eligible.contains_key(account)
    }

    pub fn transfer_calls(&self) -> usize {
        self.transfer_calls
    }

    pub fn burn_calls(&self) -> usize {
        self.burn_calls
    }

    pub fn mint_calls(&self) -> usize {
        self.mint_calls
    }

    fn held(&self, account: &AccountId, denom: &Denom) -> u128 {
        self.balances
            .get(&(account.clone(), denom.clone()))
            .copied()
            .unwrap_or(0)
    }

    fn debit(&mut self, account: &AccountId, coin: &Coin) -> Result<(), LedgerError> {
        let available = self.held(account, &coin.denom);
        if available < coin.amount {
            return Err(LedgerError::InsufficientFunds {
                account: account.to_string(),
                needed: coin.amount,
                available,
            });
        }
        self.set_balance(account, &coin.denom, available - coin.amount);
        Ok(())
    }

    fn credit(&mut self, account: &AccountId, coin: &Coin) -> Result<(), LedgerError> {
        let current = self.held(account, &coin.denom);
        let updated = current
            .checked_add(coin.amount)
            .ok_or_else(|| LedgerError::Rejected(format!("balance overflow for {account}")))?;
        self.set_balance(account, &coin.denom, updated);
        Ok(())
    }
}

impl Ledger for NullLedger {
    fn module_account(&self) -> &AccountId {
        &self.module
    }

    fn balance_of(&self, account: &AccountId, denom: &Denom) -> Result<u128, LedgerError> {
        Ok(self.held(account, denom))
    }

    fn transfer_from_module(&mut self, to: &AccountId, coin: &Coin) -> Result<(), LedgerError> {
        self.transfer_calls += 1;
        if self.fail_transfers {
            return Err(LedgerError::Rejected("transfers disabled".into()));
        }
        let module = self.module.clone();
        self.debit(&module, coin)?;
        self.credit(to, coin)
    }

    fn burn_from_account(&mut self, account: &AccountId, coin: &Coin) -> Result<(), LedgerError> {
        self.burn_calls += 1;
        if self.fail_burns {
            return Err(LedgerError::Rejected("burns disabled".into()));
        }
        self.debit(account, coin)
    }

    fn mint_to_account(&mut self, account: &AccountId, coin: &Coin) -> Result<(), LedgerError> {
        self.mint_calls += 1;
        if self.fail_mints {
            return Err(LedgerError::Rejected("mints disabled".into()));
        }
        let cap = self
            .eligible
            .get(account)
            .copied()
            .ok_or_else(|| LedgerError::NotEligible(account.to_string()))?;
        if coin.amount > cap {
            return Err(LedgerError::Rejected(format!(
                "mint of {} exceeds cap {cap} for {account}",
                coin.amount
            )));
        }
        self.credit(account, coin)
    }

    fn register_eligible(&mut self, account: &AccountId, cap: &Coin) -> Result<(), LedgerError> {
        let entry = self.eligible.entry(account.clone()).or_insert(0);
        *entry = (*entry).max(cap.amount);
        Ok(())
    }
}
