use cosmwasm_std::{Addr, Uint128};
use meta_vault_adapter::try_share_balance;
use meta_vault_allocation::AllocationManager;
use meta_vault_types::TargetHost;
use tracing::{debug, warn};

use crate::{ClaimPart, VaultError};

/// Which source covered a user withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePhase {
    /// The vault's own free idle
    Idle,
    /// Idle held by targets, drained synchronously
    TargetIdle,
    /// Targets were asked for more than they could hand back at once
    Deferred,
}

/// Result of routing a withdrawal shortfall through the targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub phase: RoutePhase,
    /// Assets that reached the vault while routing
    pub received: Uint128,
    /// Obligations left at targets, in routing order
    pub parts: Vec<ClaimPart>,
    /// Deallocations that went through; zero means no target was touched
    pub steps: usize,
    /// Targets whose deallocation failed and were passed over
    pub skipped: Vec<Addr>,
    /// First failure seen while routing
    pub failure: Option<VaultError>,
}

impl Route {
    pub fn new(phase: RoutePhase) -> Self {
        Self {
            phase,
            received: Uint128::zero(),
            parts: Vec::new(),
            steps: 0,
            skipped: Vec::new(),
            failure: None,
        }
    }

    pub fn owed(&self) -> Uint128 {
        self.parts
            .iter()
            .fold(Uint128::zero(), |acc, part| acc.saturating_add(part.amount))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pass {
    /// Take only what each target can pay out on the spot
    Synchronous,
    /// Take up to the whole position, leaving the rest owed
    Deferred,
}

/// Walk `order` taking from each target until `remaining` is covered.
///
/// Returns what is still uncovered. A target whose whole position is taken is
/// redeemed by shares so no dust is left behind. A target that rejects its
/// deallocation is left untouched and skipped for the rest of the route.
pub(crate) fn drain<H: TargetHost + ?Sized>(
    manager: &mut AllocationManager<'_, H>,
    order: &[Addr],
    mut remaining: Uint128,
    aggregator: &Addr,
    pass: Pass,
    route: &mut Route,
) -> Uint128 {
    for target in order {
        if remaining.is_zero() {
            break;
        }
        if route.skipped.contains(target) {
            continue;
        }
        let held = manager
            .state()
            .allocated_assets_for(manager.host(), target, aggregator);
        let limit = match pass {
            Pass::Synchronous => {
                manager
                    .state()
                    .target_withdrawable(manager.host(), target, aggregator)
            }
            Pass::Deferred => held,
        };
        let take = limit.min(remaining);
        if take.is_zero() {
            continue;
        }

        let result = if take == held {
            let shares = try_share_balance(manager.host(), target, aggregator);
            manager.redeem_allocation(target, shares, aggregator)
        } else {
            manager.withdraw_allocation(target, take, aggregator)
        };
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(target_vault = %target, pass = ?pass, take = %take, error = %e, "skipping target");
                route.skipped.push(target.clone());
                if route.failure.is_none() {
                    route.failure = Some(e.into());
                }
                continue;
            }
        };
        route.steps += 1;
        debug!(
            target_vault = %target,
            pass = ?pass,
            take = %take,
            received = %outcome.received,
            pending = %outcome.pending,
            "routed withdrawal"
        );

        route.received = route.received.saturating_add(outcome.received);
        remaining = remaining
            .saturating_sub(outcome.received)
            .saturating_sub(outcome.pending);
        if !outcome.pending.is_zero() {
            route.parts.push(ClaimPart {
                target: target.clone(),
                key: outcome.key,
                amount: outcome.pending,
            });
        }
    }
    remaining
}
