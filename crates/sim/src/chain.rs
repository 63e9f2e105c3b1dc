use cosmwasm_std::{Addr, Uint128};
use meta_vault_types::{Bank, BankError, Target, TargetError, TargetHost};
use std::collections::BTreeMap;

use crate::LedgerBank;

/// Simulated environment: the asset ledger plus every live target
#[derive(Default)]
pub struct Chain {
    bank: LedgerBank,
    targets: BTreeMap<Addr, Box<dyn Target>>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&mut self, account: &Addr, amount: u128) -> Result<(), BankError> {
        self.bank.mint(account, Uint128::new(amount))
    }

    /// Make a target reachable at `address`, replacing any previous one
    pub fn register(&mut self, address: Addr, target: Box<dyn Target>) {
        self.targets.insert(address, target);
    }

    /// Drop a target, simulating one that disappeared
    pub fn unregister(&mut self, address: &Addr) -> Option<Box<dyn Target>> {
        self.targets.remove(address)
    }

    pub fn ledger(&self) -> &LedgerBank {
        &self.bank
    }

    pub fn balance(&self, account: &Addr) -> Uint128 {
        self.bank.balance(account)
    }
}

impl TargetHost for Chain {
    fn bank(&self) -> &dyn Bank {
        &self.bank
    }

    fn bank_mut(&mut self) -> &mut dyn Bank {
        &mut self.bank
    }

    fn target(&self, address: &Addr) -> Result<&dyn Target, TargetError> {
        match self.targets.get(address) {
            Some(target) => {
                let target: &dyn Target = &**target;
                Ok(target)
            }
            None => Err(TargetError::NotFound(address.to_string())),
        }
    }

    fn target_with_bank(
        &mut self,
        address: &Addr,
    ) -> Result<(&mut dyn Target, &mut dyn Bank), TargetError> {
        let Chain { bank, targets } = self;
        let target = targets
            .get_mut(address)
            .ok_or_else(|| TargetError::NotFound(address.to_string()))?;
        let target: &mut dyn Target = &mut **target;
        let bank: &mut dyn Bank = bank;
        Ok((target, bank))
    }
}
