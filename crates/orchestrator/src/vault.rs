use cosmwasm_std::{Addr, Uint128};
use meta_vault_allocation::{
    sort_by_exit_cost, AllocationError, AllocationManager, AllocationState, ClaimSweep,
    Deallocation, PendingAndClaimable, SortOrder,
};
use meta_vault_types::{
    cost_on_raw, cost_on_total, mul_div_ceil, MathError, ObligationKey, TargetHost,
};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::routing::{drain, Pass};
use crate::{
    ApprovedTargets, Rounding, Route, RoutePhase, ShareLedger, TargetEligibility, UserClaim,
    UserClaims, VaultError, VaultEvent, VaultSettings,
};

/// Point-in-time breakdown of the vault's assets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accounting {
    /// Asset balance of the vault account
    pub idle: Uint128,
    /// Part of `idle` already collected for unpaid user claims
    pub reserved: Uint128,
    /// Value of the vault's shares across allocated targets
    pub allocated: Uint128,
    pub pending: Uint128,
    pub claimable: Uint128,
    /// Unpaid user claims
    pub owed_to_users: Uint128,
}

impl Accounting {
    pub fn total_assets(&self) -> Uint128 {
        self.idle
            .saturating_add(self.allocated)
            .saturating_add(self.pending)
            .saturating_add(self.claimable)
            .saturating_sub(self.owed_to_users)
    }

    /// Idle the vault may route or allocate
    pub fn free_idle(&self) -> Uint128 {
        self.idle.saturating_sub(self.reserved)
    }
}

/// Outcome of a user withdraw or redeem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawOutcome {
    pub assets: Uint128,
    pub shares: Uint128,
    /// Paid to the receiver during the call
    pub paid: Uint128,
    /// Handle for the unpaid remainder, [`ObligationKey::ZERO`] when none
    pub claim: ObligationKey,
    pub phase: RoutePhase,
}

/// Aggregating vault spreading its depositors' assets over target vaults.
///
/// Owns the allocation ledger and lends it to an [`AllocationManager`] for
/// every operation that touches targets. The environment (asset bank and
/// targets) is passed in per call.
#[derive(Debug, Clone)]
pub struct MetaVault<E = ApprovedTargets> {
    settings: VaultSettings,
    eligibility: E,
    shares: ShareLedger,
    allocation: AllocationState,
    claims: UserClaims,
    shutdown: bool,
    events: Vec<VaultEvent>,
}

impl<E: TargetEligibility> MetaVault<E> {
    pub fn new(settings: VaultSettings, eligibility: E) -> Result<Self, VaultError> {
        settings.validate()?;
        Ok(Self {
            settings,
            eligibility,
            shares: ShareLedger::new(),
            allocation: AllocationState::new(),
            claims: UserClaims::new(),
            shutdown: false,
            events: Vec::new(),
        })
    }

    /// Resume from a persisted ledger
    pub fn with_allocation_state(mut self, snapshot: AllocationState) -> Result<Self, VaultError> {
        self.allocation = AllocationState::restore(snapshot)?;
        Ok(self)
    }

    pub fn settings(&self) -> &VaultSettings {
        &self.settings
    }

    pub fn address(&self) -> &Addr {
        &self.settings.address
    }

    pub fn eligibility(&self) -> &E {
        &self.eligibility
    }

    pub fn eligibility_mut(&mut self) -> &mut E {
        &mut self.eligibility
    }

    pub fn allocation(&self) -> &AllocationState {
        &self.allocation
    }

    pub fn shares(&self) -> &ShareLedger {
        &self.shares
    }

    pub fn claims(&self) -> &UserClaims {
        &self.claims
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown
    }

    /// Drain every event recorded since the last call
    pub fn take_events(&mut self) -> Vec<VaultEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_shutdown(&mut self, caller: &Addr, active: bool) -> Result<(), VaultError> {
        self.ensure_curator(caller)?;
        if self.shutdown != active {
            self.shutdown = active;
            warn!(vault = %self.settings.address, active, "shutdown changed");
            self.events.push(VaultEvent::ShutdownChanged { active });
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // VIEWS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn accounting<H: TargetHost + ?Sized>(&self, host: &H) -> Accounting {
        let PendingAndClaimable { pending, claimable } = self.allocation.pending_and_claimable(host);
        Accounting {
            idle: host.asset_balance(&self.settings.address),
            reserved: self.claims.reserved(&self.allocation, host),
            allocated: self.allocation.allocated_assets(host, &self.settings.address),
            pending,
            claimable,
            owed_to_users: self.claims.owed(),
        }
    }

    pub fn total_assets<H: TargetHost + ?Sized>(&self, host: &H) -> Uint128 {
        self.accounting(host).total_assets()
    }

    pub fn free_idle<H: TargetHost + ?Sized>(&self, host: &H) -> Uint128 {
        self.accounting(host).free_idle()
    }

    /// Free idle plus what targets could hand back synchronously
    pub fn available_assets<H: TargetHost + ?Sized>(&self, host: &H) -> Uint128 {
        self.free_idle(host).saturating_add(
            self.allocation
                .withdrawable_from_targets(host, &self.settings.address),
        )
    }

    pub fn allocated_assets<H: TargetHost + ?Sized>(&self, host: &H) -> Uint128 {
        self.allocation.allocated_assets(host, &self.settings.address)
    }

    pub fn pending_and_claimable<H: TargetHost + ?Sized>(&self, host: &H) -> PendingAndClaimable {
        self.allocation.pending_and_claimable(host)
    }

    pub fn balance_of(&self, owner: &Addr) -> Uint128 {
        self.shares.balance_of(owner)
    }

    pub fn total_supply(&self) -> Uint128 {
        self.shares.total_supply()
    }

    pub fn convert_to_shares<H: TargetHost + ?Sized>(
        &self,
        host: &H,
        assets: Uint128,
    ) -> Result<Uint128, VaultError> {
        Ok(self
            .shares
            .to_shares(assets, self.total_assets(host), Rounding::Floor)?)
    }

    pub fn convert_to_assets<H: TargetHost + ?Sized>(
        &self,
        host: &H,
        shares: Uint128,
    ) -> Result<Uint128, VaultError> {
        Ok(self
            .shares
            .to_assets(shares, self.total_assets(host), Rounding::Floor)?)
    }

    /// Shares minted for `assets`, net of the entry cost
    pub fn preview_deposit<H: TargetHost + ?Sized>(
        &self,
        host: &H,
        assets: Uint128,
    ) -> Result<Uint128, VaultError> {
        let fee = cost_on_total(assets, self.settings.entry_cost_bps)?;
        self.convert_to_shares(host, assets - fee)
    }

    /// Assets to pay, entry cost included, for `shares`
    pub fn preview_mint<H: TargetHost + ?Sized>(
        &self,
        host: &H,
        shares: Uint128,
    ) -> Result<Uint128, VaultError> {
        let net = self
            .shares
            .to_assets(shares, self.total_assets(host), Rounding::Ceil)?;
        Ok(checked_add(net, cost_on_raw(net, self.settings.entry_cost_bps)?)?)
    }

    /// Shares burned to pay out `assets`, exit cost included
    pub fn preview_withdraw<H: TargetHost + ?Sized>(
        &self,
        host: &H,
        assets: Uint128,
    ) -> Result<Uint128, VaultError> {
        let gross = checked_add(assets, cost_on_raw(assets, self.settings.exit_cost_bps)?)?;
        Ok(self
            .shares
            .to_shares(gross, self.total_assets(host), Rounding::Ceil)?)
    }

    /// Assets paid out for `shares`, net of the exit cost
    pub fn preview_redeem<H: TargetHost + ?Sized>(
        &self,
        host: &H,
        shares: Uint128,
    ) -> Result<Uint128, VaultError> {
        let gross = self.convert_to_assets(host, shares)?;
        Ok(gross - cost_on_total(gross, self.settings.exit_cost_bps)?)
    }

    /// The owner's position capped by capital the vault can reach
    pub fn max_withdraw<H: TargetHost + ?Sized>(
        &self,
        host: &H,
        owner: &Addr,
    ) -> Result<Uint128, VaultError> {
        let accounting = self.accounting(host);
        let position = self.preview_redeem(host, self.shares.balance_of(owner))?;
        Ok(position.min(accounting.free_idle().saturating_add(accounting.allocated)))
    }

    pub fn max_redeem<H: TargetHost + ?Sized>(
        &self,
        host: &H,
        owner: &Addr,
    ) -> Result<Uint128, VaultError> {
        let accounting = self.accounting(host);
        let balance = self.shares.balance_of(owner);
        let capital = accounting.free_idle().saturating_add(accounting.allocated);
        if self.preview_redeem(host, balance)? <= capital {
            return Ok(balance);
        }
        let reachable = self
            .shares
            .to_shares(capital, accounting.total_assets(), Rounding::Floor)?;
        Ok(balance.min(reachable))
    }

    pub fn user_claim(&self, key: &ObligationKey) -> Option<&UserClaim> {
        self.claims.get(key)
    }

    /// Whether [`MetaVault::claim`] would pay `key` out right now
    pub fn is_claimable<H: TargetHost + ?Sized>(&self, host: &H, key: &ObligationKey) -> bool {
        self.claims
            .get(key)
            .is_some_and(|claim| claim.is_claimable(&self.allocation, host))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // DEPOSIT
    // ═══════════════════════════════════════════════════════════════════════

    pub fn deposit<H: TargetHost + ?Sized>(
        &mut self,
        host: &mut H,
        caller: &Addr,
        assets: Uint128,
        receiver: &Addr,
    ) -> Result<Uint128, VaultError> {
        self.ensure_open()?;
        let shares = self.preview_deposit(&*host, assets)?;
        self.enter(host, caller, receiver, assets, shares)?;
        Ok(shares)
    }

    pub fn mint<H: TargetHost + ?Sized>(
        &mut self,
        host: &mut H,
        caller: &Addr,
        shares: Uint128,
        receiver: &Addr,
    ) -> Result<Uint128, VaultError> {
        self.ensure_open()?;
        let assets = self.preview_mint(&*host, shares)?;
        self.enter(host, caller, receiver, assets, shares)?;
        Ok(assets)
    }

    fn enter<H: TargetHost + ?Sized>(
        &mut self,
        host: &mut H,
        caller: &Addr,
        receiver: &Addr,
        assets: Uint128,
        shares: Uint128,
    ) -> Result<(), VaultError> {
        if shares.is_zero() {
            return Err(VaultError::ZeroShares);
        }
        host.bank_mut()
            .transfer(caller, &self.settings.address, assets)?;
        self.shares.mint(receiver, shares);

        info!(caller = %caller, receiver = %receiver, assets = %assets, shares = %shares, "deposit");
        self.events.push(VaultEvent::Deposit {
            caller: caller.clone(),
            receiver: receiver.clone(),
            assets,
            shares,
        });
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // WITHDRAW
    // ═══════════════════════════════════════════════════════════════════════

    /// Pay `assets` to `receiver`, burning the owner's shares.
    ///
    /// Whatever targets cannot hand back during the call is left owed under a
    /// claim handle returned in [`WithdrawOutcome::claim`].
    pub fn withdraw<H: TargetHost + ?Sized>(
        &mut self,
        host: &mut H,
        caller: &Addr,
        assets: Uint128,
        receiver: &Addr,
        owner: &Addr,
    ) -> Result<WithdrawOutcome, VaultError> {
        ensure_owner(caller, owner)?;
        let max = self.max_withdraw(&*host, owner)?;
        if assets > max {
            return Err(VaultError::ExceededMaxWithdraw {
                owner: owner.clone(),
                assets,
                max,
            });
        }
        let shares = self.preview_withdraw(&*host, assets)?;
        self.exit(host, owner, receiver, assets, shares)
    }

    pub fn redeem<H: TargetHost + ?Sized>(
        &mut self,
        host: &mut H,
        caller: &Addr,
        shares: Uint128,
        receiver: &Addr,
        owner: &Addr,
    ) -> Result<WithdrawOutcome, VaultError> {
        ensure_owner(caller, owner)?;
        let max = self.max_redeem(&*host, owner)?;
        if shares > max {
            return Err(VaultError::ExceededMaxRedeem {
                owner: owner.clone(),
                shares,
                max,
            });
        }
        let assets = self.preview_redeem(&*host, shares)?;
        self.exit(host, owner, receiver, assets, shares)
    }

    fn exit<H: TargetHost + ?Sized>(
        &mut self,
        host: &mut H,
        owner: &Addr,
        receiver: &Addr,
        assets: Uint128,
        shares: Uint128,
    ) -> Result<WithdrawOutcome, VaultError> {
        if shares.is_zero() {
            return Err(VaultError::ZeroShares);
        }
        let available = self.shares.balance_of(owner);
        if available < shares {
            return Err(VaultError::InsufficientShares {
                owner: owner.clone(),
                needed: shares,
                available,
            });
        }

        let route = self.route_withdrawal(host, assets);
        let owed = route.owed();
        let due = assets.saturating_sub(owed);
        let free_idle = self.free_idle(&*host);
        let (assets, shares) = if free_idle >= due {
            (assets, shares)
        } else {
            let settled = free_idle.saturating_add(owed);
            if route.steps == 0 || settled.is_zero() {
                return Err(route.failure.unwrap_or(VaultError::InsufficientLiquidity {
                    needed: due,
                    available: free_idle,
                }));
            }
            // targets already gave up their positions, so settle for what
            // the route brought in and burn shares in proportion
            let burned = mul_div_ceil(shares, settled, assets)?.min(shares);
            warn!(
                owner = %owner,
                requested = %assets,
                settled = %settled,
                shares = %burned,
                skipped = route.skipped.len(),
                "withdrawal settled short"
            );
            (settled, burned)
        };
        let paid = assets.saturating_sub(owed);

        self.shares.burn(owner, shares)?;
        host.bank_mut()
            .transfer(&self.settings.address, receiver, paid)?;

        let claim = if owed.is_zero() {
            ObligationKey::ZERO
        } else {
            let key = self.claims.mint_key(&self.settings.address, owner);
            self.claims.insert(
                key,
                UserClaim {
                    owner: owner.clone(),
                    receiver: receiver.clone(),
                    assets: owed,
                    parts: route.parts,
                },
            );
            key
        };

        info!(
            owner = %owner,
            receiver = %receiver,
            assets = %assets,
            shares = %shares,
            paid = %paid,
            claim = %claim,
            phase = ?route.phase,
            "withdraw"
        );
        self.events.push(VaultEvent::Withdraw {
            owner: owner.clone(),
            receiver: receiver.clone(),
            assets,
            shares,
            paid,
            claim,
        });
        Ok(WithdrawOutcome {
            assets,
            shares,
            paid,
            claim,
            phase: route.phase,
        })
    }

    /// Bring enough assets into free idle to pay `assets`, or file obligations
    /// for what targets cannot return now.
    ///
    /// Targets are visited in ascending exit cost. When their idle covers the
    /// shortfall only idle is drawn; otherwise every target's idle is drawn
    /// first and the rest is requested from whole positions in the same order.
    ///
    /// A target that rejects its deallocation is skipped; the route then
    /// reports how far it got instead of failing halfway.
    fn route_withdrawal<H: TargetHost + ?Sized>(
        &mut self,
        host: &mut H,
        assets: Uint128,
    ) -> Route {
        let free_idle = self.free_idle(&*host);
        if free_idle >= assets {
            return Route::new(RoutePhase::Idle);
        }

        let shortfall = assets - free_idle;
        let aggregator = self.settings.address.clone();
        let order = sort_by_exit_cost(
            &*host,
            &self.allocation.allocated_targets(),
            SortOrder::Ascending,
        );
        let target_idle = self
            .allocation
            .withdrawable_from_targets(&*host, &aggregator);
        let phase = if target_idle >= shortfall {
            RoutePhase::TargetIdle
        } else {
            RoutePhase::Deferred
        };
        debug!(shortfall = %shortfall, target_idle = %target_idle, phase = ?phase, "routing withdrawal");

        self.with_manager(host, |manager| {
            let mut route = Route::new(phase);
            let mut remaining = drain(
                manager,
                &order,
                shortfall,
                &aggregator,
                Pass::Synchronous,
                &mut route,
            );
            // a skipped target can leave the idle pass short
            let short = phase == RoutePhase::Deferred || !route.skipped.is_empty();
            if !remaining.is_zero() && short {
                route.phase = RoutePhase::Deferred;
                remaining = drain(
                    manager,
                    &order,
                    remaining,
                    &aggregator,
                    Pass::Deferred,
                    &mut route,
                );
            }
            if !remaining.is_zero() {
                warn!(remaining = %remaining, "targets could not cover withdrawal");
            }
            route
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // USER CLAIMS
    // ═══════════════════════════════════════════════════════════════════════

    /// Pay out a claim handle once every backing obligation is collected.
    ///
    /// Runs the permissionless sweep first when parts are still outstanding.
    /// Anyone may call; assets always go to the claim's receiver.
    pub fn claim<H: TargetHost + ?Sized>(
        &mut self,
        host: &mut H,
        caller: &Addr,
        key: ObligationKey,
    ) -> Result<Uint128, VaultError> {
        let settled = self
            .claims
            .get(&key)
            .ok_or_else(|| VaultError::UnknownClaim(key.to_string()))?
            .is_settled(&self.allocation);
        if !settled {
            self.claim_allocations(host);
        }

        let claim = self
            .claims
            .get(&key)
            .ok_or_else(|| VaultError::UnknownClaim(key.to_string()))?;
        if !claim.is_settled(&self.allocation) {
            return Err(VaultError::ClaimNotReady(key.to_string()));
        }
        let (receiver, assets) = (claim.receiver.clone(), claim.assets);
        let own = claim.collected(&self.allocation, &*host);

        // idle held for other claims is off limits
        let accounting = self.accounting(&*host);
        let others = accounting.reserved.saturating_sub(own);
        let available = accounting.idle.saturating_sub(others);
        if accounting.idle < accounting.reserved {
            warn!(
                claim = %key,
                idle = %accounting.idle,
                reserved = %accounting.reserved,
                "idle below what claims have collected"
            );
        }
        if available < assets {
            return Err(VaultError::InsufficientLiquidity {
                needed: assets,
                available,
            });
        }
        host.bank_mut()
            .transfer(&self.settings.address, &receiver, assets)?;
        self.claims.remove(&key);

        info!(caller = %caller, claim = %key, receiver = %receiver, assets = %assets, "claim paid");
        self.events.push(VaultEvent::ClaimPaid {
            claim: key,
            receiver,
            assets,
        });
        Ok(assets)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // CURATOR
    // ═══════════════════════════════════════════════════════════════════════

    pub fn allocate<H: TargetHost + ?Sized>(
        &mut self,
        host: &mut H,
        caller: &Addr,
        target: &Addr,
        assets: Uint128,
    ) -> Result<Uint128, VaultError> {
        self.check_allocation(&*host, caller, std::slice::from_ref(target), &[assets])?;
        self.with_manager(host, |manager| {
            manager
                .allocate(target, assets)
                .map_err(VaultError::from)
        })
    }

    pub fn allocate_batch<H: TargetHost + ?Sized>(
        &mut self,
        host: &mut H,
        caller: &Addr,
        targets: &[Addr],
        assets: &[Uint128],
    ) -> Result<Vec<Uint128>, VaultError> {
        self.check_allocation(&*host, caller, targets, assets)?;
        self.with_manager(host, |manager| {
            manager
                .allocate_batch(targets, assets)
                .map_err(VaultError::from)
        })
    }

    /// Withdraw from a target back into the vault
    pub fn withdraw_allocation<H: TargetHost + ?Sized>(
        &mut self,
        host: &mut H,
        caller: &Addr,
        target: &Addr,
        assets: Uint128,
    ) -> Result<Deallocation, VaultError> {
        self.ensure_curator(caller)?;
        let vault = self.settings.address.clone();
        self.with_manager(host, |manager| {
            manager
                .withdraw_allocation(target, assets, &vault)
                .map_err(VaultError::from)
        })
    }

    /// Redeem target shares back into the vault
    pub fn redeem_allocation<H: TargetHost + ?Sized>(
        &mut self,
        host: &mut H,
        caller: &Addr,
        target: &Addr,
        shares: Uint128,
    ) -> Result<Deallocation, VaultError> {
        self.ensure_curator(caller)?;
        let vault = self.settings.address.clone();
        self.with_manager(host, |manager| {
            manager
                .redeem_allocation(target, shares, &vault)
                .map_err(VaultError::from)
        })
    }

    pub fn withdraw_allocation_batch<H: TargetHost + ?Sized>(
        &mut self,
        host: &mut H,
        caller: &Addr,
        targets: &[Addr],
        assets: &[Uint128],
    ) -> Result<Vec<Deallocation>, VaultError> {
        self.ensure_curator(caller)?;
        let vault = self.settings.address.clone();
        self.with_manager(host, |manager| {
            manager
                .withdraw_allocation_batch(targets, assets, &vault)
                .map_err(VaultError::from)
        })
    }

    pub fn redeem_allocation_batch<H: TargetHost + ?Sized>(
        &mut self,
        host: &mut H,
        caller: &Addr,
        targets: &[Addr],
        shares: &[Uint128],
    ) -> Result<Vec<Deallocation>, VaultError> {
        self.ensure_curator(caller)?;
        let vault = self.settings.address.clone();
        self.with_manager(host, |manager| {
            manager
                .redeem_allocation_batch(targets, shares, &vault)
                .map_err(VaultError::from)
        })
    }

    /// Permissionless sweep collecting every claimable obligation
    pub fn claim_allocations<H: TargetHost + ?Sized>(&mut self, host: &mut H) -> ClaimSweep {
        let sweep = self.with_manager(host, |manager| manager.claim_allocations());
        info!(
            collected = %sweep.assets_collected(),
            claimed = sweep.claimed.len(),
            external = sweep.claimed_externally.len(),
            pending = sweep.still_pending,
            "claim sweep"
        );
        sweep
    }

    // ═══════════════════════════════════════════════════════════════════════
    // HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    fn with_manager<H, T>(
        &mut self,
        host: &mut H,
        f: impl FnOnce(&mut AllocationManager<'_, H>) -> T,
    ) -> T
    where
        H: TargetHost + ?Sized,
    {
        let mut manager = AllocationManager::new(&mut self.allocation, host, &self.settings.address);
        let out = f(&mut manager);
        self.events
            .extend(manager.into_events().into_iter().map(VaultEvent::from));
        out
    }

    fn ensure_curator(&self, caller: &Addr) -> Result<(), VaultError> {
        if *caller != self.settings.curator {
            return Err(VaultError::Unauthorized {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), VaultError> {
        if self.shutdown {
            return Err(VaultError::Shutdown);
        }
        Ok(())
    }

    /// Every check an allocation must pass before any target is touched
    fn check_allocation<H: TargetHost + ?Sized>(
        &self,
        host: &H,
        caller: &Addr,
        targets: &[Addr],
        assets: &[Uint128],
    ) -> Result<(), VaultError> {
        if targets.len() != assets.len() {
            return Err(AllocationError::InvalidInputLength {
                left: targets.len(),
                right: assets.len(),
            }
            .into());
        }
        self.ensure_curator(caller)?;
        self.ensure_open()?;

        if let Some(target) = targets.iter().find(|t| !self.eligibility.is_eligible(t)) {
            return Err(VaultError::IneligibleTarget {
                target: target.clone(),
            });
        }

        let fresh: HashSet<&Addr> = targets
            .iter()
            .zip(assets)
            .filter(|(target, amount)| !amount.is_zero() && !self.allocation.is_allocated(target))
            .map(|(target, _)| target)
            .collect();
        if self.allocation.allocated_targets().len() + fresh.len() > self.settings.max_targets {
            return Err(VaultError::TooManyTargets {
                max: self.settings.max_targets,
            });
        }

        let total = assets
            .iter()
            .try_fold(Uint128::zero(), |acc, amount| checked_add(acc, *amount))?;
        let free_idle = self.free_idle(host);
        if total > free_idle {
            return Err(VaultError::InsufficientLiquidity {
                needed: total,
                available: free_idle,
            });
        }
        Ok(())
    }
}

fn checked_add(a: Uint128, b: Uint128) -> Result<Uint128, MathError> {
    a.checked_add(b).map_err(|_| MathError::Overflow)
}

fn ensure_owner(caller: &Addr, owner: &Addr) -> Result<(), VaultError> {
    if caller != owner {
        return Err(VaultError::Unauthorized {
            caller: caller.clone(),
        });
    }
    Ok(())
}
