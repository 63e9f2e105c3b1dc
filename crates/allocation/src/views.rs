use cosmwasm_std::{Addr, Uint128};
use meta_vault_adapter::{
    try_idle_assets, try_is_claimable, try_is_claimed, try_preview_assets, try_share_balance,
};
use meta_vault_types::TargetHost;

use crate::AllocationState;

/// Outstanding obligations split by whether they can be collected now
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingAndClaimable {
    pub pending: Uint128,
    pub claimable: Uint128,
}

impl PendingAndClaimable {
    pub fn total(&self) -> Uint128 {
        self.pending.saturating_add(self.claimable)
    }
}

impl AllocationState {
    /// Assets the vault's shares at `target` would realize.
    ///
    /// Uses the same preview-then-convert rule as a real redeem.
    pub fn allocated_assets_for<H: TargetHost + ?Sized>(
        &self,
        host: &H,
        target: &Addr,
        aggregator: &Addr,
    ) -> Uint128 {
        let shares = try_share_balance(host, target, aggregator);
        try_preview_assets(host, target, shares)
    }

    pub fn allocated_assets<H: TargetHost + ?Sized>(&self, host: &H, aggregator: &Addr) -> Uint128 {
        self.allocated_targets()
            .iter()
            .fold(Uint128::zero(), |acc, target| {
                acc.saturating_add(self.allocated_assets_for(host, target, aggregator))
            })
    }

    /// Bucket every recorded amount into pending or claimable.
    ///
    /// Keys the target reports as already claimed count as neither.
    pub fn pending_and_claimable<H: TargetHost + ?Sized>(&self, host: &H) -> PendingAndClaimable {
        let mut totals = PendingAndClaimable::default();
        for target in self.claimable_targets() {
            for key in self.withdraw_keys_for(&target) {
                if try_is_claimed(host, &target, key) {
                    continue;
                }
                let amount = self.requested_assets(&target, &key);
                if try_is_claimable(host, &target, key) {
                    totals.claimable = totals.claimable.saturating_add(amount);
                } else {
                    totals.pending = totals.pending.saturating_add(amount);
                }
            }
        }
        totals
    }

    /// Assets targets could hand back synchronously, each capped by what the
    /// vault actually holds there
    pub fn withdrawable_from_targets<H: TargetHost + ?Sized>(
        &self,
        host: &H,
        aggregator: &Addr,
    ) -> Uint128 {
        self.allocated_targets()
            .iter()
            .fold(Uint128::zero(), |acc, target| {
                acc.saturating_add(self.target_withdrawable(host, target, aggregator))
            })
    }

    pub fn target_withdrawable<H: TargetHost + ?Sized>(
        &self,
        host: &H,
        target: &Addr,
        aggregator: &Addr,
    ) -> Uint128 {
        try_idle_assets(host, target).min(self.allocated_assets_for(host, target, aggregator))
    }
}
