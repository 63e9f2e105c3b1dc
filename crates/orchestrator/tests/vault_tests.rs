//! Meta vault behaviour over simulated targets
//!
//! Target A (exit cost 100 bps) and target B (exit cost 200 bps) offer the
//! request/claim extension; target S is synchronous only.

use cosmwasm_std::testing::MockApi;
use cosmwasm_std::{Addr, Uint128};
use meta_vault_allocation::{AllocationError, AllocationEvent};
use meta_vault_orchestrator::*;
use meta_vault_sim::{Chain, SimVault};
use meta_vault_types::{AsyncTarget, Bank, MathError, ObligationKey, TargetError, TargetHost};

struct Addrs {
    vault: Addr,
    curator: Addr,
    alice: Addr,
    bob: Addr,
    a: Addr,
    b: Addr,
    s: Addr,
    unlisted: Addr,
}

struct Env {
    chain: Chain,
    vault: MetaVault,
    a: SimVault,
    b: SimVault,
    s: SimVault,
    addrs: Addrs,
}

fn u(n: u128) -> Uint128 {
    Uint128::new(n)
}

fn addrs() -> Addrs {
    let api = MockApi::default();
    Addrs {
        vault: api.addr_make("meta_vault"),
        curator: api.addr_make("curator"),
        alice: api.addr_make("alice"),
        bob: api.addr_make("bob"),
        a: api.addr_make("target_a"),
        b: api.addr_make("target_b"),
        s: api.addr_make("target_s"),
        unlisted: api.addr_make("unlisted"),
    }
}

fn setup_with(settings: impl FnOnce(VaultSettings) -> VaultSettings) -> Env {
    let addrs = addrs();
    let mut chain = Chain::new();
    chain.mint(&addrs.alice, 10_000).unwrap();
    chain.mint(&addrs.bob, 10_000).unwrap();

    let a = SimVault::builder(addrs.a.clone()).asynchronous().exit_cost(100).build();
    let b = SimVault::builder(addrs.b.clone()).asynchronous().exit_cost(200).build();
    let s = SimVault::builder(addrs.s.clone()).build();
    chain.register(addrs.a.clone(), Box::new(a.clone()));
    chain.register(addrs.b.clone(), Box::new(b.clone()));
    chain.register(addrs.s.clone(), Box::new(s.clone()));

    let approved: ApprovedTargets = [addrs.a.clone(), addrs.b.clone(), addrs.s.clone()]
        .into_iter()
        .collect();
    let vault = MetaVault::new(
        settings(VaultSettings::new(addrs.vault.clone(), addrs.curator.clone())),
        approved,
    )
    .unwrap();

    Env {
        chain,
        vault,
        a,
        b,
        s,
        addrs,
    }
}

fn setup() -> Env {
    setup_with(|settings| settings)
}

/// Alice deposits 5000 and the curator puts 1000 into each of A and B
fn funded() -> Env {
    let mut env = setup();
    let (alice, curator) = (env.addrs.alice.clone(), env.addrs.curator.clone());
    let targets = vec![env.addrs.a.clone(), env.addrs.b.clone()];
    env.vault.deposit(&mut env.chain, &alice, u(5_000), &alice).unwrap();
    env.vault
        .allocate_batch(&mut env.chain, &curator, &targets, &[u(1_000), u(1_000)])
        .unwrap();
    env.vault.take_events();
    env
}

impl Env {
    fn idle(&self) -> Uint128 {
        self.chain.balance(&self.addrs.vault)
    }

    fn total_assets(&self) -> Uint128 {
        self.vault.total_assets(&self.chain)
    }

    fn withdraw_as_alice(&mut self, assets: u128) -> Result<WithdrawOutcome, VaultError> {
        let alice = self.addrs.alice.clone();
        self.vault
            .withdraw(&mut self.chain, &alice, u(assets), &alice, &alice)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// DEPOSIT / MINT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_first_deposit_mints_one_to_one() {
    let mut env = setup();
    let alice = env.addrs.alice.clone();

    let shares = env.vault.deposit(&mut env.chain, &alice, u(5_000), &alice).unwrap();

    assert_eq!(shares, u(5_000));
    assert_eq!(env.vault.balance_of(&alice), u(5_000));
    assert_eq!(env.idle(), u(5_000));
    assert_eq!(env.total_assets(), u(5_000));
    assert_eq!(
        env.vault.take_events(),
        vec![VaultEvent::Deposit {
            caller: alice.clone(),
            receiver: alice.clone(),
            assets: u(5_000),
            shares: u(5_000),
        }]
    );
    assert!(env.vault.take_events().is_empty());
}

#[test]
fn test_entry_cost_stays_in_vault() {
    let mut env = setup_with(|s| s.with_costs(100, 0));
    let alice = env.addrs.alice.clone();

    // fee = ceil(10_000 * 100 / 10_100) = 100
    let shares = env.vault.deposit(&mut env.chain, &alice, u(10_000), &alice).unwrap();
    assert_eq!(shares, u(9_900));
    assert_eq!(env.total_assets(), u(10_000));
}

#[test]
fn test_mint_charges_assets_for_shares() {
    let mut env = setup();
    let bob = env.addrs.bob.clone();
    let assets = env.vault.mint(&mut env.chain, &bob, u(1_000), &bob).unwrap();
    assert_eq!(assets, u(1_000));
    assert_eq!(env.chain.balance(&bob), u(9_000));
    assert_eq!(env.vault.total_supply(), u(1_000));
}

#[test]
fn test_dust_deposit_rejected() {
    let mut env = setup_with(|s| s.with_costs(10_000, 0));
    let alice = env.addrs.alice.clone();
    // a 100% entry cost leaves nothing to mint
    assert_eq!(
        env.vault.deposit(&mut env.chain, &alice, u(1), &alice),
        Err(VaultError::ZeroShares)
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// SHUTDOWN / AUTHORISATION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_shutdown_blocks_entry_but_not_exit() {
    let mut env = funded();
    let (alice, curator, a) = (
        env.addrs.alice.clone(),
        env.addrs.curator.clone(),
        env.addrs.a.clone(),
    );

    env.vault.set_shutdown(&curator, true).unwrap();
    assert!(env.vault.is_shutdown());
    assert_eq!(
        env.vault.take_events(),
        vec![VaultEvent::ShutdownChanged { active: true }]
    );

    assert_eq!(
        env.vault.deposit(&mut env.chain, &alice, u(10), &alice),
        Err(VaultError::Shutdown)
    );
    assert_eq!(
        env.vault.mint(&mut env.chain, &alice, u(10), &alice),
        Err(VaultError::Shutdown)
    );
    assert_eq!(
        env.vault.allocate(&mut env.chain, &curator, &a, u(10)),
        Err(VaultError::Shutdown)
    );

    // depositors can always leave, and the curator can still unwind
    env.withdraw_as_alice(500).unwrap();
    env.vault
        .withdraw_allocation(&mut env.chain, &curator, &a, u(100))
        .unwrap();
    env.vault.claim_allocations(&mut env.chain);
}

#[test]
fn test_curator_only_operations() {
    let mut env = funded();
    let (alice, a) = (env.addrs.alice.clone(), env.addrs.a.clone());
    let unauthorized = VaultError::Unauthorized { caller: alice.clone() };

    assert_eq!(
        env.vault.allocate(&mut env.chain, &alice, &a, u(10)),
        Err(unauthorized.clone())
    );
    assert_eq!(env.vault.set_shutdown(&alice, true), Err(unauthorized));
    assert!(!env.vault.is_shutdown());
    assert!(matches!(
        env.vault.withdraw_allocation(&mut env.chain, &alice, &a, u(10)),
        Err(VaultError::Unauthorized { .. })
    ));
    assert!(matches!(
        env.vault.redeem_allocation_batch(&mut env.chain, &alice, &[a.clone()], &[u(10)]),
        Err(VaultError::Unauthorized { .. })
    ));
}

#[test]
fn test_withdraw_requires_owner() {
    let mut env = funded();
    let (alice, bob) = (env.addrs.alice.clone(), env.addrs.bob.clone());
    assert_eq!(
        env.vault.withdraw(&mut env.chain, &bob, u(10), &bob, &alice),
        Err(VaultError::Unauthorized { caller: bob.clone() })
    );
    assert_eq!(env.vault.balance_of(&alice), u(5_000));
}

// ═══════════════════════════════════════════════════════════════════════════
// ALLOCATION ENTRY POINTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_allocate_checks_eligibility_capacity_and_liquidity() {
    let mut env = setup_with(|s| s.with_max_targets(2));
    let (alice, curator) = (env.addrs.alice.clone(), env.addrs.curator.clone());
    let (a, b, s, unlisted) = (
        env.addrs.a.clone(),
        env.addrs.b.clone(),
        env.addrs.s.clone(),
        env.addrs.unlisted.clone(),
    );
    env.vault.deposit(&mut env.chain, &alice, u(3_000), &alice).unwrap();

    assert_eq!(
        env.vault.allocate(&mut env.chain, &curator, &unlisted, u(10)),
        Err(VaultError::IneligibleTarget { target: unlisted.clone() })
    );
    assert_eq!(
        env.vault.allocate(&mut env.chain, &curator, &a, u(3_001)),
        Err(VaultError::InsufficientLiquidity {
            needed: u(3_001),
            available: u(3_000),
        })
    );

    env.vault.allocate(&mut env.chain, &curator, &a, u(1_000)).unwrap();
    env.vault.allocate(&mut env.chain, &curator, &b, u(1_000)).unwrap();
    assert_eq!(
        env.vault.allocate(&mut env.chain, &curator, &s, u(1_000)),
        Err(VaultError::TooManyTargets { max: 2 })
    );
    // topping up an existing allocation is not a new target
    env.vault.allocate(&mut env.chain, &curator, &a, u(500)).unwrap();

    // revoking eligibility blocks further allocation
    env.vault.eligibility_mut().revoke(&a);
    assert!(matches!(
        env.vault.allocate(&mut env.chain, &curator, &a, u(1)),
        Err(VaultError::IneligibleTarget { .. })
    ));
}

#[test]
fn test_batch_length_mismatch_changes_nothing() {
    let mut env = funded();
    let curator = env.addrs.curator.clone();
    let targets = vec![env.addrs.a.clone(), env.addrs.b.clone()];
    let ledger_before = env.vault.allocation().clone();
    let idle_before = env.idle();

    assert_eq!(
        env.vault.allocate_batch(&mut env.chain, &curator, &targets, &[u(1)]),
        Err(VaultError::Allocation(AllocationError::InvalidInputLength {
            left: 2,
            right: 1,
        }))
    );
    assert!(matches!(
        env.vault
            .withdraw_allocation_batch(&mut env.chain, &curator, &targets, &[u(1), u(1), u(1)]),
        Err(VaultError::Allocation(AllocationError::InvalidInputLength { .. }))
    ));
    assert!(matches!(
        env.vault
            .redeem_allocation_batch(&mut env.chain, &curator, &targets, &[]),
        Err(VaultError::Allocation(AllocationError::InvalidInputLength { .. }))
    ));

    assert_eq!(env.vault.allocation(), &ledger_before);
    assert_eq!(env.idle(), idle_before);
    assert!(env.vault.take_events().is_empty());
}

#[test]
fn test_curator_deallocation_is_conservative() {
    let mut env = funded();
    let curator = env.addrs.curator.clone();
    let a = env.addrs.a.clone();
    assert_eq!(env.total_assets(), u(5_000));

    env.a.deploy_all(env.chain.bank_mut()).unwrap();
    let outcome = env
        .vault
        .withdraw_allocation(&mut env.chain, &curator, &a, u(600))
        .unwrap();
    assert_eq!(outcome.pending, u(600));
    assert_eq!(env.total_assets(), u(5_000));

    env.a.recall(env.chain.bank_mut(), u(600)).unwrap();
    assert_eq!(
        env.vault.pending_and_claimable(&env.chain),
        meta_vault_allocation::PendingAndClaimable {
            pending: Uint128::zero(),
            claimable: u(600),
        }
    );
    assert_eq!(env.total_assets(), u(5_000));

    let sweep = env.vault.claim_allocations(&mut env.chain);
    assert_eq!(sweep.assets_collected(), u(600));
    assert_eq!(env.idle(), u(3_600));
    assert_eq!(env.total_assets(), u(5_000));
    assert!(env
        .vault
        .take_events()
        .iter()
        .any(|e| matches!(e, VaultEvent::Allocation(AllocationEvent::Claimed { .. }))));
}

// ═══════════════════════════════════════════════════════════════════════════
// WITHDRAWAL ROUTING
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_idle_sufficient_withdrawal_touches_no_target() {
    let mut env = funded();
    let ledger_before = env.vault.allocation().clone();

    let outcome = env.withdraw_as_alice(2_500).unwrap();

    assert_eq!(outcome.phase, RoutePhase::Idle);
    assert_eq!(outcome.paid, u(2_500));
    assert_eq!(outcome.claim, ObligationKey::ZERO);
    assert_eq!(env.vault.allocation(), &ledger_before);
    let events = env.vault.take_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], VaultEvent::Withdraw { .. }));
}

#[test]
fn test_target_idle_drains_cheapest_first() {
    let mut env = funded();
    let (alice, a, b) = (env.addrs.alice.clone(), env.addrs.a.clone(), env.addrs.b.clone());

    let outcome = env.withdraw_as_alice(4_500).unwrap();

    assert_eq!(outcome.phase, RoutePhase::TargetIdle);
    assert_eq!(outcome.paid, u(4_500));
    assert_eq!(outcome.claim, ObligationKey::ZERO);
    assert_eq!(env.chain.balance(&alice), u(9_500));
    // A fully redeemed and pruned, B drawn for the remaining 500
    assert_eq!(env.vault.allocation().allocated_targets(), vec![b.clone()]);
    assert_eq!(env.a.idle().unwrap(), Uint128::zero());
    assert_eq!(env.b.idle().unwrap(), u(500));
    assert!(env.vault.allocation().claimable_targets().is_empty());
    assert_eq!(env.idle(), Uint128::zero());
    assert_eq!(env.total_assets(), u(500));

    let routed: Vec<Addr> = env
        .vault
        .take_events()
        .iter()
        .filter_map(|e| match e {
            VaultEvent::Allocation(AllocationEvent::Redeemed { target, .. })
            | VaultEvent::Allocation(AllocationEvent::Withdrawn { target, .. }) => {
                Some(target.clone())
            }
            _ => None,
        })
        .collect();
    assert_eq!(routed, vec![a, b]);
}

#[test]
fn test_deferred_withdrawal_issues_claim_handle() {
    let mut env = funded();
    let (alice, a) = (env.addrs.alice.clone(), env.addrs.a.clone());
    env.a.deploy_all(env.chain.bank_mut()).unwrap();
    env.b.deploy_all(env.chain.bank_mut()).unwrap();

    let outcome = env.withdraw_as_alice(4_000).unwrap();

    assert_eq!(outcome.phase, RoutePhase::Deferred);
    assert_eq!(outcome.paid, u(3_000));
    assert!(!outcome.claim.is_zero());
    let claim = env.vault.user_claim(&outcome.claim).cloned().unwrap();
    assert_eq!(claim.assets, u(1_000));
    assert_eq!(claim.parts.len(), 1);
    assert_eq!(claim.parts[0].target, a);
    assert_eq!(env.vault.claims().keys_for(&alice), vec![outcome.claim]);
    assert_eq!(env.total_assets(), u(1_000));

    // not ready until the target frees funds
    assert!(!env.vault.is_claimable(&env.chain, &outcome.claim));
    assert_eq!(
        env.vault.claim(&mut env.chain, &alice, outcome.claim),
        Err(VaultError::ClaimNotReady(outcome.claim.to_string()))
    );

    env.a.recall(env.chain.bank_mut(), u(1_000)).unwrap();
    assert!(env.vault.is_claimable(&env.chain, &outcome.claim));

    let paid = env.vault.claim(&mut env.chain, &alice, outcome.claim).unwrap();
    assert_eq!(paid, u(1_000));
    assert_eq!(env.chain.balance(&alice), u(9_000));
    assert_eq!(env.idle(), Uint128::zero());
    assert!(env.vault.claims().is_empty());
    assert_eq!(
        env.vault.claim(&mut env.chain, &alice, outcome.claim),
        Err(VaultError::UnknownClaim(outcome.claim.to_string()))
    );
}

#[test]
fn test_claim_handle_survives_external_claim() {
    let mut env = funded();
    let (alice, bob) = (env.addrs.alice.clone(), env.addrs.bob.clone());
    env.a.deploy_all(env.chain.bank_mut()).unwrap();
    env.b.deploy_all(env.chain.bank_mut()).unwrap();

    let claim = env.withdraw_as_alice(4_000).unwrap().claim;
    let part_key = env.vault.user_claim(&claim).unwrap().parts[0].key;
    env.a.recall(env.chain.bank_mut(), u(1_000)).unwrap();

    // bob claims straight at the target; the assets still land in the vault
    let mut handle = env.a.clone();
    handle.claim(env.chain.bank_mut(), &bob, part_key).unwrap();
    assert_eq!(env.idle(), u(1_000));
    assert_eq!(env.vault.free_idle(&env.chain), Uint128::zero());
    assert_eq!(env.total_assets(), u(1_000));

    // reserved idle is not handed to other depositors
    env.vault.deposit(&mut env.chain, &bob, u(1_000), &bob).unwrap();
    let outcome = env
        .vault
        .withdraw(&mut env.chain, &bob, u(500), &bob, &bob)
        .unwrap();
    assert_eq!(outcome.phase, RoutePhase::Idle);

    let paid = env.vault.claim(&mut env.chain, &alice, claim).unwrap();
    assert_eq!(paid, u(1_000));
    assert!(env.vault.allocation().claimable_targets().is_empty());
    assert!(env.vault.take_events().iter().any(|e| matches!(
        e,
        VaultEvent::Allocation(AllocationEvent::ClaimedExternally { key, .. }) if *key == part_key
    )));
}

#[test]
fn test_sync_target_serves_deferred_pass() {
    let mut env = setup();
    let (alice, curator, s) = (
        env.addrs.alice.clone(),
        env.addrs.curator.clone(),
        env.addrs.s.clone(),
    );
    env.vault.deposit(&mut env.chain, &alice, u(5_000), &alice).unwrap();
    env.vault.allocate(&mut env.chain, &curator, &s, u(3_000)).unwrap();

    // S reports no idle, so routing falls through to whole positions
    let outcome = env.withdraw_as_alice(2_500).unwrap();
    assert_eq!(outcome.phase, RoutePhase::Deferred);
    assert_eq!(outcome.paid, u(2_500));
    assert_eq!(outcome.claim, ObligationKey::ZERO);
    assert_eq!(env.s.idle().unwrap(), u(2_500));
}

#[test]
fn test_failed_sync_fallback_burns_nothing() {
    let mut env = setup();
    let (alice, curator, s) = (
        env.addrs.alice.clone(),
        env.addrs.curator.clone(),
        env.addrs.s.clone(),
    );
    env.vault.deposit(&mut env.chain, &alice, u(5_000), &alice).unwrap();
    env.vault.allocate(&mut env.chain, &curator, &s, u(3_000)).unwrap();
    env.s.deploy_all(env.chain.bank_mut()).unwrap();

    let err = env.withdraw_as_alice(2_500).unwrap_err();
    assert!(matches!(
        err,
        VaultError::Allocation(AllocationError::Target(TargetError::InsufficientLiquidity { .. }))
    ));
    assert_eq!(env.vault.balance_of(&alice), u(5_000));
    assert_eq!(env.chain.balance(&alice), u(5_000));
    assert_eq!(env.total_assets(), u(5_000));
    assert_eq!(env.vault.allocation().allocated_targets(), vec![s.clone()]);
    assert!(env.vault.allocation().claimable_targets().is_empty());
    assert_eq!(env.s.shares_of(&env.addrs.vault).unwrap(), u(3_000));
}

#[test]
fn test_withdraw_rejected_by_every_target_leaves_ledger_unchanged() {
    let mut env = funded();
    let (alice, vault) = (env.addrs.alice.clone(), env.addrs.vault.clone());
    env.a.deploy_all(env.chain.bank_mut()).unwrap();
    env.b.deploy_all(env.chain.bank_mut()).unwrap();
    env.a.set_fail_requests(true).unwrap();
    env.b.set_fail_requests(true).unwrap();
    let allocated = env.vault.allocation().allocated_targets();

    let err = env.withdraw_as_alice(4_500).unwrap_err();
    assert!(matches!(
        err,
        VaultError::Allocation(AllocationError::Target(TargetError::InsufficientLiquidity { .. }))
    ));

    assert_eq!(env.vault.allocation().allocated_targets(), allocated);
    assert!(env.vault.allocation().claimable_targets().is_empty());
    assert_eq!(env.a.shares_of(&vault).unwrap(), u(1_000));
    assert_eq!(env.b.shares_of(&vault).unwrap(), u(1_000));
    assert_eq!(env.vault.balance_of(&alice), u(5_000));
    assert!(env.vault.claims().is_empty());
    assert_eq!(env.total_assets(), u(5_000));
}

#[test]
fn test_rejecting_target_is_skipped_and_withdrawal_settles_short() {
    let mut env = funded();
    let (alice, a, b) = (
        env.addrs.alice.clone(),
        env.addrs.a.clone(),
        env.addrs.b.clone(),
    );
    env.a.deploy_all(env.chain.bank_mut()).unwrap();
    env.b.deploy_all(env.chain.bank_mut()).unwrap();
    env.b.set_fail_requests(true).unwrap();

    // A files its whole position before B refuses; the filed part must end
    // up owned by a claim handle rather than orphaned in the ledger
    let outcome = env.withdraw_as_alice(4_500).unwrap();

    assert_eq!(outcome.phase, RoutePhase::Deferred);
    assert_eq!(outcome.assets, u(4_000));
    assert_eq!(outcome.shares, u(4_000));
    assert_eq!(outcome.paid, u(3_000));
    assert_eq!(env.vault.balance_of(&alice), u(1_000));
    assert_eq!(env.chain.balance(&alice), u(8_000));

    let claim = env.vault.user_claim(&outcome.claim).cloned().unwrap();
    assert_eq!(claim.assets, u(1_000));
    assert_eq!(claim.parts.len(), 1);
    assert_eq!(claim.parts[0].target, a);
    assert_eq!(env.vault.claims().len(), 1);

    assert_eq!(env.vault.allocation().allocated_targets(), vec![b]);
    assert_eq!(env.vault.allocation().claimable_targets(), vec![a]);
    assert_eq!(env.b.shares_of(&env.addrs.vault).unwrap(), u(1_000));
    assert_eq!(env.vault.allocation().total_requested(), claim.assets);
    assert_eq!(env.total_assets(), u(1_000));
}

#[test]
fn test_claim_never_spends_another_claims_reserve() {
    let mut env = funded();
    let alice = env.addrs.alice.clone();
    env.a.deploy_all(env.chain.bank_mut()).unwrap();
    env.b.deploy_all(env.chain.bank_mut()).unwrap();

    let first = env.withdraw_as_alice(3_500).unwrap();
    let second = env.withdraw_as_alice(1_000).unwrap();
    assert_eq!(env.vault.user_claim(&first.claim).unwrap().assets, u(500));
    assert_eq!(env.vault.user_claim(&second.claim).unwrap().assets, u(1_000));

    env.a.recall(env.chain.bank_mut(), u(1_000)).unwrap();
    env.b.recall(env.chain.bank_mut(), u(500)).unwrap();
    env.vault.claim_allocations(&mut env.chain);
    assert_eq!(env.idle(), u(1_500));
    assert_eq!(env.vault.accounting(&env.chain).reserved, u(1_500));

    // idle falls short of what was collected for the two claims
    let (vault, bob) = (env.addrs.vault.clone(), env.addrs.bob.clone());
    env.chain.bank_mut().transfer(&vault, &bob, u(600)).unwrap();

    assert_eq!(
        env.vault.claim(&mut env.chain, &alice, first.claim),
        Err(VaultError::InsufficientLiquidity {
            needed: u(500),
            available: Uint128::zero(),
        })
    );
    assert_eq!(env.idle(), u(900));
    assert_eq!(env.vault.claims().len(), 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// LIMITS AND FEES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_max_withdraw_and_redeem() {
    let mut env = funded();
    let alice = env.addrs.alice.clone();

    assert_eq!(env.vault.max_withdraw(&env.chain, &alice).unwrap(), u(5_000));
    assert_eq!(env.vault.max_redeem(&env.chain, &alice).unwrap(), u(5_000));
    assert_eq!(
        env.withdraw_as_alice(5_001),
        Err(VaultError::ExceededMaxWithdraw {
            owner: alice.clone(),
            assets: u(5_001),
            max: u(5_000),
        })
    );
    assert_eq!(
        env.vault
            .redeem(&mut env.chain, &alice, u(5_001), &alice, &alice),
        Err(VaultError::ExceededMaxRedeem {
            owner: alice.clone(),
            shares: u(5_001),
            max: u(5_000),
        })
    );
    assert_eq!(
        env.withdraw_as_alice(0),
        Err(VaultError::ZeroShares)
    );
}

#[test]
fn test_redeem_everything_through_deferred_route() {
    let mut env = funded();
    let alice = env.addrs.alice.clone();
    env.a.deploy_all(env.chain.bank_mut()).unwrap();
    env.b.deploy_all(env.chain.bank_mut()).unwrap();

    let outcome = env
        .vault
        .redeem(&mut env.chain, &alice, u(5_000), &alice, &alice)
        .unwrap();

    assert_eq!(outcome.assets, u(5_000));
    assert_eq!(outcome.paid, u(3_000));
    let claim = env.vault.user_claim(&outcome.claim).unwrap();
    assert_eq!(claim.assets, u(2_000));
    assert_eq!(claim.parts.len(), 2);
    assert!(env.vault.allocation().allocated_targets().is_empty());
    assert_eq!(env.vault.total_supply(), Uint128::zero());
    assert_eq!(env.total_assets(), Uint128::zero());
}

#[test]
fn test_exit_cost_accrues_to_remaining_holders() {
    let mut env = setup_with(|s| s.with_costs(0, 100));
    let (alice, bob) = (env.addrs.alice.clone(), env.addrs.bob.clone());
    env.vault.deposit(&mut env.chain, &alice, u(5_000), &alice).unwrap();
    env.vault.deposit(&mut env.chain, &bob, u(5_000), &bob).unwrap();

    // 1000 out costs ceil(1000 * 1%) = 10 on top, paid in shares
    let outcome = env.withdraw_as_alice(1_000).unwrap();
    assert_eq!(outcome.shares, u(1_010));
    assert_eq!(env.total_assets(), u(9_000));
    assert_eq!(env.vault.total_supply(), u(8_990));
    assert!(env.vault.convert_to_assets(&env.chain, u(5_000)).unwrap() > u(5_000));
}

#[test]
fn test_preview_overflow_is_an_error() {
    let env = setup_with(|s| s.with_costs(0, 100));
    assert_eq!(
        env.vault.preview_withdraw(&env.chain, Uint128::MAX),
        Err(VaultError::Math(MathError::Overflow))
    );
}

#[test]
fn test_settings_validation() {
    let addrs = addrs();
    let bad_cost = VaultSettings::new(addrs.vault.clone(), addrs.curator.clone()).with_costs(10_001, 0);
    assert!(matches!(
        MetaVault::new(bad_cost, ApprovedTargets::new()),
        Err(VaultError::InvalidSettings(_))
    ));
    let self_curated = VaultSettings::new(addrs.vault.clone(), addrs.vault.clone());
    assert!(matches!(
        MetaVault::new(self_curated, ApprovedTargets::new()),
        Err(VaultError::InvalidSettings(_))
    ));
}
