use cosmwasm_std::{Addr, Uint128};
use indexmap::IndexMap;
use meta_vault_types::{mul_div_ceil, mul_div_floor, MathError};
use serde::{Deserialize, Serialize};

use crate::VaultError;

/// Supply and backing with the virtual share and asset added
fn offset(supply: Uint128, total_assets: Uint128) -> Result<(Uint128, Uint128), MathError> {
    let supply = supply.checked_add(Uint128::one()).map_err(|_| MathError::Overflow)?;
    let backing = total_assets
        .checked_add(Uint128::one())
        .map_err(|_| MathError::Overflow)?;
    Ok((supply, backing))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Floor,
    Ceil,
}

/// Share balances of the meta vault's depositors.
///
/// Conversions use a virtual offset of one share and one asset, so the first
/// deposit mints 1:1 and donations cannot inflate the price from zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLedger {
    balances: IndexMap<Addr, Uint128>,
    total_supply: Uint128,
}

impl ShareLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, owner: &Addr) -> Uint128 {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    pub fn total_supply(&self) -> Uint128 {
        self.total_supply
    }

    pub fn holders(&self) -> usize {
        self.balances.len()
    }

    pub fn to_shares(
        &self,
        assets: Uint128,
        total_assets: Uint128,
        rounding: Rounding,
    ) -> Result<Uint128, MathError> {
        let (supply, backing) = offset(self.total_supply, total_assets)?;
        match rounding {
            Rounding::Floor => mul_div_floor(assets, supply, backing),
            Rounding::Ceil => mul_div_ceil(assets, supply, backing),
        }
    }

    pub fn to_assets(
        &self,
        shares: Uint128,
        total_assets: Uint128,
        rounding: Rounding,
    ) -> Result<Uint128, MathError> {
        let (supply, backing) = offset(self.total_supply, total_assets)?;
        match rounding {
            Rounding::Floor => mul_div_floor(shares, backing, supply),
            Rounding::Ceil => mul_div_ceil(shares, backing, supply),
        }
    }

    pub(crate) fn mint(&mut self, owner: &Addr, shares: Uint128) {
        *self.balances.entry(owner.clone()).or_default() += shares;
        self.total_supply += shares;
    }

    pub(crate) fn burn(&mut self, owner: &Addr, shares: Uint128) -> Result<(), VaultError> {
        let available = self.balance_of(owner);
        if available < shares {
            return Err(VaultError::InsufficientShares {
                owner: owner.clone(),
                needed: shares,
                available,
            });
        }
        let remaining = available - shares;
        if remaining.is_zero() {
            self.balances.swap_remove(owner);
        } else {
            self.balances.insert(owner.clone(), remaining);
        }
        self.total_supply -= shares;
        Ok(())
    }
}
