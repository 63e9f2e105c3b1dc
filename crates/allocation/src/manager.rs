use cosmwasm_std::{Addr, Uint128};
use meta_vault_adapter::{
    deposit, share_balance, try_claim, try_is_claimable, try_is_claimed, try_preview_assets,
    try_request_redeem, try_request_withdraw,
};
use meta_vault_types::{ObligationKey, TargetHost};
use tracing::{debug, info};

use crate::{AllocationError, AllocationEvent, AllocationState};

// ═══════════════════════════════════════════════════════════════════════════
// RESULTS
// ═══════════════════════════════════════════════════════════════════════════

/// Outcome of a single withdraw or redeem against a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deallocation {
    pub target: Addr,
    /// [`ObligationKey::ZERO`] when nothing was left owed
    pub key: ObligationKey,
    /// Assets asked for, or previewed for a redeem
    pub requested: Uint128,
    /// Assets that reached the receiver during the call
    pub received: Uint128,
    /// Assets recorded against the key
    pub pending: Uint128,
}

impl Deallocation {
    fn noop(target: &Addr) -> Self {
        Self {
            target: target.clone(),
            key: ObligationKey::ZERO,
            requested: Uint128::zero(),
            received: Uint128::zero(),
            pending: Uint128::zero(),
        }
    }

    pub fn created_obligation(&self) -> bool {
        !self.key.is_zero()
    }
}

/// One key removed from the ledger by a sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedObligation {
    pub target: Addr,
    pub key: ObligationKey,
    /// Amount the ledger had recorded for the key
    pub recorded: Uint128,
    /// Amount the sweep itself collected
    pub collected: Uint128,
}

/// Summary of a claim sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimSweep {
    pub claimed: Vec<ResolvedObligation>,
    pub claimed_externally: Vec<ResolvedObligation>,
    pub still_pending: usize,
    pub targets_cleared: Vec<Addr>,
}

impl ClaimSweep {
    pub fn assets_collected(&self) -> Uint128 {
        self.claimed
            .iter()
            .fold(Uint128::zero(), |acc, r| acc.saturating_add(r.collected))
    }

    pub fn is_resolved(&self, target: &Addr, key: &ObligationKey) -> bool {
        self.claimed
            .iter()
            .chain(self.claimed_externally.iter())
            .any(|r| &r.target == target && &r.key == key)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// MANAGER
// ═══════════════════════════════════════════════════════════════════════════

/// Allocation operations over a borrowed ledger.
///
/// Each instance lives for one top-level vault operation; events accumulate
/// until taken with [`AllocationManager::into_events`].
pub struct AllocationManager<'a, H: TargetHost + ?Sized> {
    state: &'a mut AllocationState,
    host: &'a mut H,
    aggregator: Addr,
    events: Vec<AllocationEvent>,
}

impl<'a, H: TargetHost + ?Sized> AllocationManager<'a, H> {
    pub fn new(state: &'a mut AllocationState, host: &'a mut H, aggregator: &Addr) -> Self {
        Self {
            state,
            host,
            aggregator: aggregator.clone(),
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &AllocationState {
        &*self.state
    }

    pub fn host(&self) -> &H {
        &*self.host
    }

    pub fn events(&self) -> &[AllocationEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<AllocationEvent> {
        self.events
    }

    // ═══════════════════════════════════════════════════════════════════════
    // ALLOCATE
    // ═══════════════════════════════════════════════════════════════════════

    /// Deposit `assets` into `target`; returns the shares received
    pub fn allocate(&mut self, target: &Addr, assets: Uint128) -> Result<Uint128, AllocationError> {
        if assets.is_zero() {
            return Ok(Uint128::zero());
        }
        let shares = deposit(&mut *self.host, target, assets, &self.aggregator)?;
        self.state.insert_allocated(target);

        info!(target_vault = %target, assets = %assets, shares = %shares, "allocated");
        self.events.push(AllocationEvent::Allocated {
            target: target.clone(),
            assets,
            shares,
        });
        Ok(shares)
    }

    pub fn allocate_batch(
        &mut self,
        targets: &[Addr],
        assets: &[Uint128],
    ) -> Result<Vec<Uint128>, AllocationError> {
        check_lengths(targets.len(), assets.len())?;
        targets
            .iter()
            .zip(assets)
            .map(|(target, amount)| self.allocate(target, *amount))
            .collect()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // DEALLOCATE
    // ═══════════════════════════════════════════════════════════════════════

    /// Withdraw `assets` from `target` to `receiver`, recording any remainder
    /// the target could not settle on the spot
    pub fn withdraw_allocation(
        &mut self,
        target: &Addr,
        assets: Uint128,
        receiver: &Addr,
    ) -> Result<Deallocation, AllocationError> {
        if assets.is_zero() {
            return Ok(Deallocation::noop(target));
        }

        let before = self.host.asset_balance(receiver);
        let key = try_request_withdraw(&mut *self.host, target, assets, receiver, &self.aggregator)?;
        let received = self.host.asset_balance(receiver).saturating_sub(before);

        let outcome = self.settle(target, key, assets, received);
        info!(
            target_vault = %target,
            assets = %assets,
            received = %received,
            key = %key,
            "withdrew allocation"
        );
        self.events.push(AllocationEvent::Withdrawn {
            target: target.clone(),
            assets,
            receiver: receiver.clone(),
            key,
            received,
        });
        self.prune_allocated(target);
        Ok(outcome)
    }

    /// Redeem `shares` at `target` to `receiver`, recording any remainder
    pub fn redeem_allocation(
        &mut self,
        target: &Addr,
        shares: Uint128,
        receiver: &Addr,
    ) -> Result<Deallocation, AllocationError> {
        if shares.is_zero() {
            return Ok(Deallocation::noop(target));
        }

        let expected = try_preview_assets(&*self.host, target, shares);
        let before = self.host.asset_balance(receiver);
        let key = try_request_redeem(&mut *self.host, target, shares, receiver, &self.aggregator)?;
        let received = self.host.asset_balance(receiver).saturating_sub(before);

        let outcome = self.settle(target, key, expected, received);
        info!(
            target_vault = %target,
            shares = %shares,
            received = %received,
            key = %key,
            "redeemed allocation"
        );
        self.events.push(AllocationEvent::Redeemed {
            target: target.clone(),
            shares,
            receiver: receiver.clone(),
            key,
            received,
        });
        self.prune_allocated(target);
        Ok(outcome)
    }

    pub fn withdraw_allocation_batch(
        &mut self,
        targets: &[Addr],
        assets: &[Uint128],
        receiver: &Addr,
    ) -> Result<Vec<Deallocation>, AllocationError> {
        check_lengths(targets.len(), assets.len())?;
        targets
            .iter()
            .zip(assets)
            .map(|(target, amount)| self.withdraw_allocation(target, *amount, receiver))
            .collect()
    }

    pub fn redeem_allocation_batch(
        &mut self,
        targets: &[Addr],
        shares: &[Uint128],
        receiver: &Addr,
    ) -> Result<Vec<Deallocation>, AllocationError> {
        check_lengths(targets.len(), shares.len())?;
        targets
            .iter()
            .zip(shares)
            .map(|(target, amount)| self.redeem_allocation(target, *amount, receiver))
            .collect()
    }

    /// Record the unsettled remainder under `key`; the key is tracked even
    /// when nothing remains, since only a sweep can confirm settlement
    fn settle(
        &mut self,
        target: &Addr,
        key: ObligationKey,
        requested: Uint128,
        received: Uint128,
    ) -> Deallocation {
        let pending = if key.is_zero() {
            Uint128::zero()
        } else {
            requested.saturating_sub(received)
        };
        self.state.record_obligation(target, key, pending);
        Deallocation {
            target: target.clone(),
            key,
            requested,
            received,
            pending,
        }
    }

    /// Drop `target` from the allocated set on an observed zero share balance
    fn prune_allocated(&mut self, target: &Addr) {
        match share_balance(&*self.host, target, &self.aggregator) {
            Ok(balance) if balance.is_zero() => {
                if self.state.remove_allocated(target) {
                    debug!(target_vault = %target, "pruned drained target");
                    self.events.push(AllocationEvent::TargetPruned {
                        target: target.clone(),
                    });
                }
            }
            Ok(_) => {}
            Err(e) => debug!(target_vault = %target, error = %e, "share balance unreadable, not pruning"),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // CLAIM SWEEP
    // ═══════════════════════════════════════════════════════════════════════

    /// Visit every outstanding key, collecting what is claimable and dropping
    /// what someone else already claimed. Never fails: an unreachable or
    /// misbehaving target just leaves its keys pending.
    pub fn claim_allocations(&mut self) -> ClaimSweep {
        let mut sweep = ClaimSweep::default();

        for target in self.state.claimable_targets() {
            for key in self.state.withdraw_keys_for(&target) {
                let recorded = self.state.requested_assets(&target, &key);

                if try_is_claimable(&*self.host, &target, key) {
                    // credit only what reached the aggregator; a key filed for
                    // another receiver pays out elsewhere
                    let before = self.host.asset_balance(&self.aggregator);
                    let reported = try_claim(&mut *self.host, &target, key, &self.aggregator);
                    let collected = self
                        .host
                        .asset_balance(&self.aggregator)
                        .saturating_sub(before);
                    if collected != reported {
                        debug!(
                            target_vault = %target,
                            key = %key,
                            reported = %reported,
                            collected = %collected,
                            "claim paid out elsewhere"
                        );
                    }
                    // a failed claim reads as zero; only drop the key once delivery is confirmed
                    if collected.is_zero() && !try_is_claimed(&*self.host, &target, key) {
                        sweep.still_pending += 1;
                        continue;
                    }
                    self.state.resolve_obligation(&target, &key);
                    info!(target_vault = %target, key = %key, assets = %collected, "claimed allocation");
                    self.events.push(AllocationEvent::Claimed {
                        target: target.clone(),
                        key,
                        assets: collected,
                    });
                    sweep.claimed.push(ResolvedObligation {
                        target: target.clone(),
                        key,
                        recorded,
                        collected,
                    });
                } else if try_is_claimed(&*self.host, &target, key) {
                    self.state.resolve_obligation(&target, &key);
                    info!(target_vault = %target, key = %key, "allocation claimed externally");
                    self.events.push(AllocationEvent::ClaimedExternally {
                        target: target.clone(),
                        key,
                    });
                    sweep.claimed_externally.push(ResolvedObligation {
                        target: target.clone(),
                        key,
                        recorded,
                        collected: Uint128::zero(),
                    });
                } else {
                    sweep.still_pending += 1;
                }
            }

            if self.state.prune_claimable(&target) {
                sweep.targets_cleared.push(target);
            }
        }

        debug!(
            claimed = sweep.claimed.len(),
            external = sweep.claimed_externally.len(),
            pending = sweep.still_pending,
            "claim sweep finished"
        );
        sweep
    }
}

fn check_lengths(left: usize, right: usize) -> Result<(), AllocationError> {
    if left != right {
        return Err(AllocationError::InvalidInputLength { left, right });
    }
    Ok(())
}
