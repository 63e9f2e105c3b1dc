use cosmwasm_std::{Addr, Uint128};
use indexmap::{IndexMap, IndexSet};
use meta_vault_types::{ObligationKey, STATE_VERSION};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::AllocationError;

/// Ledger of where the vault's capital sits and what it is still owed.
///
/// Owned by the vault and lent to an [`crate::AllocationManager`] for each
/// operation. Sets keep insertion order and remove by swapping the last
/// element into the hole, so enumeration order matches an enumerable set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationState {
    version: u16,
    /// Targets where the vault holds a nonzero share balance
    allocated_targets: IndexSet<Addr>,
    /// Targets with at least one outstanding key
    claimable_targets: IndexSet<Addr>,
    withdraw_keys: IndexMap<Addr, IndexSet<ObligationKey>>,
    /// Unsettled amount per key at creation time; absent means zero
    requested_assets: IndexMap<Addr, IndexMap<ObligationKey, Uint128>>,
}

impl Default for AllocationState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            allocated_targets: IndexSet::new(),
            claimable_targets: IndexSet::new(),
            withdraw_keys: IndexMap::new(),
            requested_assets: IndexMap::new(),
        }
    }
}

impl AllocationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a persisted snapshot after checking its version and invariants
    pub fn restore(snapshot: AllocationState) -> Result<Self, AllocationError> {
        if snapshot.version != STATE_VERSION {
            return Err(AllocationError::UnsupportedStateVersion {
                found: snapshot.version,
                expected: STATE_VERSION,
            });
        }
        snapshot.check_invariants()?;
        Ok(snapshot)
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    // ═══════════════════════════════════════════════════════════════════════
    // READS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn allocated_targets(&self) -> Vec<Addr> {
        self.allocated_targets.iter().cloned().collect()
    }

    pub fn claimable_targets(&self) -> Vec<Addr> {
        self.claimable_targets.iter().cloned().collect()
    }

    pub fn is_allocated(&self, target: &Addr) -> bool {
        self.allocated_targets.contains(target)
    }

    pub fn has_obligations(&self, target: &Addr) -> bool {
        self.claimable_targets.contains(target)
    }

    pub fn withdraw_keys_for(&self, target: &Addr) -> Vec<ObligationKey> {
        self.withdraw_keys
            .get(target)
            .map(|keys| keys.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn contains_key(&self, target: &Addr, key: &ObligationKey) -> bool {
        self.withdraw_keys
            .get(target)
            .is_some_and(|keys| keys.contains(key))
    }

    pub fn requested_assets(&self, target: &Addr, key: &ObligationKey) -> Uint128 {
        self.requested_assets
            .get(target)
            .and_then(|amounts| amounts.get(key))
            .copied()
            .unwrap_or_default()
    }

    /// Number of outstanding keys across all targets
    pub fn obligation_count(&self) -> usize {
        self.withdraw_keys.values().map(IndexSet::len).sum()
    }

    /// Sum of every recorded unsettled amount
    pub fn total_requested(&self) -> Uint128 {
        self.requested_assets
            .values()
            .flat_map(|amounts| amounts.values())
            .fold(Uint128::zero(), |acc, amount| acc.saturating_add(*amount))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // WRITES
    // ═══════════════════════════════════════════════════════════════════════

    pub(crate) fn insert_allocated(&mut self, target: &Addr) -> bool {
        self.allocated_targets.insert(target.clone())
    }

    pub(crate) fn remove_allocated(&mut self, target: &Addr) -> bool {
        self.allocated_targets.swap_remove(target)
    }

    /// Track `key` at `target`; the zero key is never stored.
    ///
    /// A key seen twice for the same target keeps one entry and accumulates
    /// its pending amount.
    pub(crate) fn record_obligation(
        &mut self,
        target: &Addr,
        key: ObligationKey,
        pending: Uint128,
    ) -> bool {
        if key.is_zero() {
            return false;
        }
        self.claimable_targets.insert(target.clone());
        let fresh = self
            .withdraw_keys
            .entry(target.clone())
            .or_default()
            .insert(key);
        if !fresh {
            warn!(target_vault = %target, key = %key, "target reissued an outstanding key");
        }
        if !pending.is_zero() {
            let recorded = self
                .requested_assets
                .entry(target.clone())
                .or_default()
                .entry(key)
                .or_default();
            *recorded = recorded.saturating_add(pending);
        }
        fresh
    }

    /// Forget `key` at `target`, returning the amount that was recorded for it
    pub(crate) fn resolve_obligation(&mut self, target: &Addr, key: &ObligationKey) -> Uint128 {
        if let Some(keys) = self.withdraw_keys.get_mut(target) {
            keys.swap_remove(key);
        }
        let mut amount = Uint128::zero();
        if let Some(amounts) = self.requested_assets.get_mut(target) {
            amount = amounts.swap_remove(key).unwrap_or_default();
            if amounts.is_empty() {
                self.requested_assets.swap_remove(target);
            }
        }
        amount
    }

    /// Drop `target` from the claimable set once its key set is empty
    pub(crate) fn prune_claimable(&mut self, target: &Addr) -> bool {
        let empty = self
            .withdraw_keys
            .get(target)
            .map_or(true, IndexSet::is_empty);
        if !empty {
            return false;
        }
        self.withdraw_keys.swap_remove(target);
        self.requested_assets.swap_remove(target);
        self.claimable_targets.swap_remove(target)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // INVARIANTS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn check_invariants(&self) -> Result<(), AllocationError> {
        for target in &self.claimable_targets {
            let keys = self.withdraw_keys.get(target).map_or(0, IndexSet::len);
            if keys == 0 {
                return Err(AllocationError::InvariantViolation(format!(
                    "claimable target {} has no outstanding keys",
                    target
                )));
            }
        }
        for (target, keys) in &self.withdraw_keys {
            if !keys.is_empty() && !self.claimable_targets.contains(target) {
                return Err(AllocationError::InvariantViolation(format!(
                    "target {} has keys but is not claimable",
                    target
                )));
            }
            if keys.iter().any(ObligationKey::is_zero) {
                return Err(AllocationError::InvariantViolation(format!(
                    "zero key stored for target {}",
                    target
                )));
            }
        }
        for (target, amounts) in &self.requested_assets {
            for key in amounts.keys() {
                if !self.contains_key(target, key) {
                    return Err(AllocationError::InvariantViolation(format!(
                        "requested amount for {} at {} has no live key",
                        key, target
                    )));
                }
            }
        }
        Ok(())
    }
}
