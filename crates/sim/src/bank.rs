use cosmwasm_std::{Addr, Uint128};
use meta_vault_types::{Bank, BankError};
use std::collections::BTreeMap;

/// Plain balance map for the simulated asset
#[derive(Debug, Clone, Default)]
pub struct LedgerBank {
    balances: BTreeMap<Addr, Uint128>,
}

impl LedgerBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `amount` new units in `account`
    pub fn mint(&mut self, account: &Addr, amount: Uint128) -> Result<(), BankError> {
        let entry = self.balances.entry(account.clone()).or_default();
        *entry = entry
            .checked_add(amount)
            .map_err(|_| BankError::Overflow(account.to_string()))?;
        Ok(())
    }

    pub fn total_supply(&self) -> Uint128 {
        self.balances.values().fold(Uint128::zero(), |acc, b| acc + *b)
    }
}

impl Bank for LedgerBank {
    fn balance(&self, account: &Addr) -> Uint128 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    fn transfer(&mut self, from: &Addr, to: &Addr, amount: Uint128) -> Result<(), BankError> {
        if amount.is_zero() || from == to {
            return Ok(());
        }
        let available = self.balance(from);
        if available < amount {
            return Err(BankError::InsufficientBalance {
                account: from.to_string(),
                needed: amount.to_string(),
                available: available.to_string(),
            });
        }
        let credited = self
            .balance(to)
            .checked_add(amount)
            .map_err(|_| BankError::Overflow(to.to_string()))?;
        self.balances.insert(from.clone(), available - amount);
        self.balances.insert(to.clone(), credited);
        Ok(())
    }
}
