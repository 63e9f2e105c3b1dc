use cosmwasm_std::{Addr, Uint128};

use crate::{BankError, Target, TargetError};

/// Balance ledger of the single asset the vault and its targets share
pub trait Bank {
    fn balance(&self, account: &Addr) -> Uint128;

    fn transfer(&mut self, from: &Addr, to: &Addr, amount: Uint128) -> Result<(), BankError>;
}

/// Environment through which the engine reaches external targets and the
/// asset ledger.
///
/// Targets are not owned by the engine; the host resolves addresses to live
/// targets for the duration of a single call.
pub trait TargetHost {
    fn bank(&self) -> &dyn Bank;

    fn bank_mut(&mut self) -> &mut dyn Bank;

    fn target(&self, address: &Addr) -> Result<&dyn Target, TargetError>;

    /// Mutable target together with the bank it settles through
    fn target_with_bank(
        &mut self,
        address: &Addr,
    ) -> Result<(&mut dyn Target, &mut dyn Bank), TargetError>;

    fn asset_balance(&self, account: &Addr) -> Uint128 {
        self.bank().balance(account)
    }
}
