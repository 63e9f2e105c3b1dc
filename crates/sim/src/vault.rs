use cosmwasm_std::{Addr, Uint128};
use meta_vault_types::{
    mul_div_ceil, mul_div_floor, AsyncTarget, Bank, ObligationKey, Target, TargetError,
    WithdrawRequest,
};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

// ═══════════════════════════════════════════════════════════════════════════
// STATE
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
struct SimRequest {
    owner: Addr,
    receiver: Addr,
    /// Assets owed when the request was filed
    assets: Uint128,
    /// Assets set aside for this request so far
    filled: Uint128,
    /// Assets still waiting for the strategy to free them
    outstanding: Uint128,
    claimed: bool,
}

#[derive(Debug)]
struct VaultState {
    address: Addr,
    strategy: Addr,
    shares: HashMap<Addr, Uint128>,
    total_shares: Uint128,
    /// Held at `address`, free to pay out
    idle: Uint128,
    /// Held at `address`, earmarked for filled requests
    reserved: Uint128,
    /// Held at `strategy`
    deployed: Uint128,
    requests: BTreeMap<ObligationKey, SimRequest>,
    queue: VecDeque<ObligationKey>,
    next_request: u64,
    async_enabled: bool,
    preview_enabled: bool,
    issue_key_when_settled: bool,
    entry_cost_bps: u64,
    exit_cost_bps: u64,
    fail_deposits: bool,
    fail_requests: bool,
    fail_queries: bool,
}

impl VaultState {
    fn owed(&self) -> Uint128 {
        self.requests
            .values()
            .filter(|r| !r.claimed)
            .fold(Uint128::zero(), |acc, r| acc + r.outstanding)
    }

    fn total_assets(&self) -> Uint128 {
        (self.idle + self.deployed).saturating_sub(self.owed())
    }

    fn to_shares_floor(&self, assets: Uint128) -> Result<Uint128, TargetError> {
        Ok(mul_div_floor(
            assets,
            self.total_shares + Uint128::one(),
            self.total_assets() + Uint128::one(),
        )?)
    }

    fn to_shares_ceil(&self, assets: Uint128) -> Result<Uint128, TargetError> {
        Ok(mul_div_ceil(
            assets,
            self.total_shares + Uint128::one(),
            self.total_assets() + Uint128::one(),
        )?)
    }

    fn to_assets(&self, shares: Uint128) -> Result<Uint128, TargetError> {
        Ok(mul_div_floor(
            shares,
            self.total_assets() + Uint128::one(),
            self.total_shares + Uint128::one(),
        )?)
    }

    fn shares_of(&self, account: &Addr) -> Uint128 {
        self.shares.get(account).copied().unwrap_or_default()
    }

    fn burn(&mut self, owner: &Addr, shares: Uint128) -> Result<(), TargetError> {
        let available = self.shares_of(owner);
        if available < shares {
            return Err(TargetError::InsufficientShares {
                needed: shares.to_string(),
                available: available.to_string(),
            });
        }
        self.shares.insert(owner.clone(), available - shares);
        self.total_shares -= shares;
        Ok(())
    }

    fn pay(
        &mut self,
        bank: &mut dyn Bank,
        receiver: &Addr,
        assets: Uint128,
    ) -> Result<(), TargetError> {
        if assets > self.idle {
            return Err(TargetError::InsufficientLiquidity {
                needed: assets.to_string(),
                available: self.idle.to_string(),
            });
        }
        bank.transfer(&self.address, receiver, assets)?;
        self.idle -= assets;
        Ok(())
    }

    /// Pay what idle allows now and queue the rest under a fresh key
    fn file_request(
        &mut self,
        bank: &mut dyn Bank,
        assets: Uint128,
        receiver: &Addr,
        owner: &Addr,
    ) -> Result<ObligationKey, TargetError> {
        let immediate = assets.min(self.idle);
        self.pay(bank, receiver, immediate)?;
        let outstanding = assets - immediate;
        if outstanding.is_zero() && !self.issue_key_when_settled {
            return Ok(ObligationKey::ZERO);
        }

        self.next_request += 1;
        let key = ObligationKey::derive(&[
            self.address.as_bytes(),
            &self.next_request.to_be_bytes(),
        ]);
        self.requests.insert(
            key,
            SimRequest {
                owner: owner.clone(),
                receiver: receiver.clone(),
                assets: outstanding,
                filled: Uint128::zero(),
                outstanding,
                claimed: false,
            },
        );
        self.queue.push_back(key);
        debug!(vault = %self.address, key = %key, outstanding = %outstanding, "request filed");
        Ok(key)
    }

    /// Move idle into queued requests in filing order
    fn fill_queue(&mut self) {
        while let Some(key) = self.queue.front().copied() {
            if self.idle.is_zero() {
                break;
            }
            let Some(request) = self.requests.get_mut(&key) else {
                self.queue.pop_front();
                continue;
            };
            let take = request.outstanding.min(self.idle);
            request.outstanding -= take;
            request.filled += take;
            self.idle -= take;
            self.reserved += take;
            if request.outstanding.is_zero() {
                self.queue.pop_front();
            } else {
                break;
            }
        }
    }

    fn request(&self, key: &ObligationKey) -> Result<&SimRequest, TargetError> {
        self.requests
            .get(key)
            .ok_or_else(|| TargetError::UnknownRequest(key.to_string()))
    }

    fn check_queries(&self) -> Result<(), TargetError> {
        if self.fail_queries {
            return Err(TargetError::Reverted("query failure injected".to_string()));
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// HANDLE
// ═══════════════════════════════════════════════════════════════════════════

/// Cloneable handle to a simulated target vault.
///
/// One clone is registered with the [`crate::Chain`]; tests keep another to
/// drive the strategy side (deploy, recall) and to act as third parties.
#[derive(Debug, Clone)]
pub struct SimVault {
    inner: Arc<Mutex<VaultState>>,
}

/// Builder for [`SimVault`]
#[derive(Debug, Clone)]
pub struct SimVaultBuilder {
    address: Addr,
    async_enabled: bool,
    preview_enabled: bool,
    issue_key_when_settled: bool,
    entry_cost_bps: u64,
    exit_cost_bps: u64,
}

impl SimVaultBuilder {
    /// Offer the request/claim extension
    pub fn asynchronous(mut self) -> Self {
        self.async_enabled = true;
        self
    }

    pub fn entry_cost(mut self, bps: u64) -> Self {
        self.entry_cost_bps = bps;
        self
    }

    pub fn exit_cost(mut self, bps: u64) -> Self {
        self.exit_cost_bps = bps;
        self
    }

    /// Hide `preview_redeem`, forcing callers onto `convert_to_assets`
    pub fn without_preview(mut self) -> Self {
        self.preview_enabled = false;
        self
    }

    /// Issue a key even when a request is paid in full on the spot
    pub fn issue_keys_when_settled(mut self) -> Self {
        self.issue_key_when_settled = true;
        self
    }

    pub fn build(self) -> SimVault {
        let strategy = Addr::unchecked(format!("{}/strategy", self.address));
        SimVault {
            inner: Arc::new(Mutex::new(VaultState {
                address: self.address,
                strategy,
                shares: HashMap::new(),
                total_shares: Uint128::zero(),
                idle: Uint128::zero(),
                reserved: Uint128::zero(),
                deployed: Uint128::zero(),
                requests: BTreeMap::new(),
                queue: VecDeque::new(),
                next_request: 0,
                async_enabled: self.async_enabled,
                preview_enabled: self.preview_enabled,
                issue_key_when_settled: self.issue_key_when_settled,
                entry_cost_bps: self.entry_cost_bps,
                exit_cost_bps: self.exit_cost_bps,
                fail_deposits: false,
                fail_requests: false,
                fail_queries: false,
            })),
        }
    }
}

impl SimVault {
    pub fn builder(address: Addr) -> SimVaultBuilder {
        SimVaultBuilder {
            address,
            async_enabled: false,
            preview_enabled: true,
            issue_key_when_settled: false,
            entry_cost_bps: 0,
            exit_cost_bps: 0,
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, VaultState>, TargetError> {
        self.inner
            .lock()
            .map_err(|_| TargetError::Reverted("vault state poisoned".to_string()))
    }

    pub fn address(&self) -> Result<Addr, TargetError> {
        Ok(self.state()?.address.clone())
    }

    /// Send idle assets to the strategy, making them unavailable for payouts
    pub fn deploy(&self, bank: &mut dyn Bank, assets: Uint128) -> Result<(), TargetError> {
        let mut state = self.state()?;
        if assets > state.idle {
            return Err(TargetError::InsufficientLiquidity {
                needed: assets.to_string(),
                available: state.idle.to_string(),
            });
        }
        let (from, to) = (state.address.clone(), state.strategy.clone());
        bank.transfer(&from, &to, assets)?;
        state.idle -= assets;
        state.deployed += assets;
        Ok(())
    }

    /// Deploy every idle asset
    pub fn deploy_all(&self, bank: &mut dyn Bank) -> Result<(), TargetError> {
        let idle = self.state()?.idle;
        self.deploy(bank, idle)
    }

    /// Bring assets back from the strategy, filling queued requests first
    pub fn recall(&self, bank: &mut dyn Bank, assets: Uint128) -> Result<(), TargetError> {
        let mut state = self.state()?;
        if assets > state.deployed {
            return Err(TargetError::InsufficientLiquidity {
                needed: assets.to_string(),
                available: state.deployed.to_string(),
            });
        }
        let (from, to) = (state.strategy.clone(), state.address.clone());
        bank.transfer(&from, &to, assets)?;
        state.deployed -= assets;
        state.idle += assets;
        state.fill_queue();
        Ok(())
    }

    pub fn set_async_enabled(&self, enabled: bool) -> Result<(), TargetError> {
        self.state()?.async_enabled = enabled;
        Ok(())
    }

    pub fn set_fail_deposits(&self, fail: bool) -> Result<(), TargetError> {
        self.state()?.fail_deposits = fail;
        Ok(())
    }

    /// Make every asynchronous request revert
    pub fn set_fail_requests(&self, fail: bool) -> Result<(), TargetError> {
        self.state()?.fail_requests = fail;
        Ok(())
    }

    /// Make every read-only query revert
    pub fn set_fail_queries(&self, fail: bool) -> Result<(), TargetError> {
        self.state()?.fail_queries = fail;
        Ok(())
    }

    pub fn idle(&self) -> Result<Uint128, TargetError> {
        Ok(self.state()?.idle)
    }

    pub fn deployed(&self) -> Result<Uint128, TargetError> {
        Ok(self.state()?.deployed)
    }

    pub fn total_assets(&self) -> Result<Uint128, TargetError> {
        Ok(self.state()?.total_assets())
    }

    pub fn shares_of(&self, account: &Addr) -> Result<Uint128, TargetError> {
        Ok(self.state()?.shares_of(account))
    }

    /// Keys not yet delivered
    pub fn open_requests(&self) -> Result<Vec<ObligationKey>, TargetError> {
        Ok(self
            .state()?
            .requests
            .iter()
            .filter(|(_, r)| !r.claimed)
            .map(|(k, _)| *k)
            .collect())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TARGET SURFACE
// ═══════════════════════════════════════════════════════════════════════════

impl Target for SimVault {
    fn deposit(
        &mut self,
        bank: &mut dyn Bank,
        caller: &Addr,
        assets: Uint128,
        receiver: &Addr,
    ) -> Result<Uint128, TargetError> {
        let mut state = self.state()?;
        if state.fail_deposits {
            return Err(TargetError::Reverted("deposit failure injected".to_string()));
        }
        let shares = state.to_shares_floor(assets)?;
        let vault = state.address.clone();
        bank.transfer(caller, &vault, assets)?;
        state.idle += assets;
        state.total_shares += shares;
        *state.shares.entry(receiver.clone()).or_default() += shares;
        Ok(shares)
    }

    fn withdraw(
        &mut self,
        bank: &mut dyn Bank,
        _caller: &Addr,
        assets: Uint128,
        receiver: &Addr,
        owner: &Addr,
    ) -> Result<Uint128, TargetError> {
        let mut state = self.state()?;
        let shares = state.to_shares_ceil(assets)?;
        if assets > state.idle {
            return Err(TargetError::InsufficientLiquidity {
                needed: assets.to_string(),
                available: state.idle.to_string(),
            });
        }
        state.burn(owner, shares)?;
        state.pay(bank, receiver, assets)?;
        Ok(shares)
    }

    fn redeem(
        &mut self,
        bank: &mut dyn Bank,
        _caller: &Addr,
        shares: Uint128,
        receiver: &Addr,
        owner: &Addr,
    ) -> Result<Uint128, TargetError> {
        let mut state = self.state()?;
        let assets = state.to_assets(shares)?;
        if assets > state.idle {
            return Err(TargetError::InsufficientLiquidity {
                needed: assets.to_string(),
                available: state.idle.to_string(),
            });
        }
        state.burn(owner, shares)?;
        state.pay(bank, receiver, assets)?;
        Ok(assets)
    }

    fn balance_of(&self, account: &Addr) -> Result<Uint128, TargetError> {
        let state = self.state()?;
        state.check_queries()?;
        Ok(state.shares_of(account))
    }

    fn convert_to_assets(&self, shares: Uint128) -> Result<Uint128, TargetError> {
        let state = self.state()?;
        state.check_queries()?;
        state.to_assets(shares)
    }

    fn preview_redeem(&self, shares: Uint128) -> Result<Uint128, TargetError> {
        let state = self.state()?;
        state.check_queries()?;
        if !state.preview_enabled {
            return Err(TargetError::Unsupported("preview_redeem"));
        }
        state.to_assets(shares)
    }

    fn as_async(&self) -> Option<&dyn AsyncTarget> {
        let enabled = self.state().map(|s| s.async_enabled).unwrap_or(false);
        if enabled {
            Some(self)
        } else {
            None
        }
    }

    fn as_async_mut(&mut self) -> Option<&mut dyn AsyncTarget> {
        let enabled = self.state().map(|s| s.async_enabled).unwrap_or(false);
        if enabled {
            Some(self)
        } else {
            None
        }
    }
}

impl AsyncTarget for SimVault {
    fn max_request_withdraw(&self, owner: &Addr) -> Result<Uint128, TargetError> {
        let state = self.state()?;
        state.check_queries()?;
        state.to_assets(state.shares_of(owner))
    }

    fn max_request_redeem(&self, owner: &Addr) -> Result<Uint128, TargetError> {
        let state = self.state()?;
        state.check_queries()?;
        Ok(state.shares_of(owner))
    }

    fn request_withdraw(
        &mut self,
        bank: &mut dyn Bank,
        _caller: &Addr,
        assets: Uint128,
        receiver: &Addr,
        owner: &Addr,
    ) -> Result<ObligationKey, TargetError> {
        let mut state = self.state()?;
        if state.fail_requests {
            return Err(TargetError::Reverted("request failure injected".to_string()));
        }
        let shares = state.to_shares_ceil(assets)?;
        state.burn(owner, shares)?;
        state.file_request(bank, assets, receiver, owner)
    }

    fn request_redeem(
        &mut self,
        bank: &mut dyn Bank,
        _caller: &Addr,
        shares: Uint128,
        receiver: &Addr,
        owner: &Addr,
    ) -> Result<ObligationKey, TargetError> {
        let mut state = self.state()?;
        if state.fail_requests {
            return Err(TargetError::Reverted("request failure injected".to_string()));
        }
        let assets = state.to_assets(shares)?;
        state.burn(owner, shares)?;
        state.file_request(bank, assets, receiver, owner)
    }

    fn claim(
        &mut self,
        bank: &mut dyn Bank,
        _caller: &Addr,
        key: ObligationKey,
    ) -> Result<Uint128, TargetError> {
        let mut state = self.state()?;
        let request = state.request(&key)?.clone();
        if request.claimed {
            return Err(TargetError::AlreadyClaimed(key.to_string()));
        }
        if !request.outstanding.is_zero() {
            return Err(TargetError::NotClaimable(key.to_string()));
        }
        let vault = state.address.clone();
        bank.transfer(&vault, &request.receiver, request.filled)?;
        state.reserved -= request.filled;
        if let Some(r) = state.requests.get_mut(&key) {
            r.claimed = true;
        }
        debug!(vault = %vault, key = %key, assets = %request.filled, "request claimed");
        Ok(request.filled)
    }

    fn is_claimable(&self, key: ObligationKey) -> Result<bool, TargetError> {
        let state = self.state()?;
        state.check_queries()?;
        let request = state.request(&key)?;
        Ok(!request.claimed && request.outstanding.is_zero())
    }

    fn withdraw_request(&self, key: ObligationKey) -> Result<WithdrawRequest, TargetError> {
        let state = self.state()?;
        state.check_queries()?;
        let request = state.request(&key)?;
        Ok(WithdrawRequest {
            owner: request.owner.clone(),
            receiver: request.receiver.clone(),
            assets: request.assets,
            claimed: request.claimed,
        })
    }

    fn idle_assets(&self) -> Result<Uint128, TargetError> {
        let state = self.state()?;
        state.check_queries()?;
        Ok(state.idle)
    }

    fn entry_cost(&self) -> Result<u64, TargetError> {
        let state = self.state()?;
        state.check_queries()?;
        Ok(state.entry_cost_bps)
    }

    fn exit_cost(&self) -> Result<u64, TargetError> {
        let state = self.state()?;
        state.check_queries()?;
        Ok(state.exit_cost_bps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LedgerBank;

    fn setup(asynchronous: bool) -> (SimVault, LedgerBank, Addr) {
        let mut builder = SimVault::builder(Addr::unchecked("target"));
        if asynchronous {
            builder = builder.asynchronous();
        }
        let vault = builder.build();
        let user = Addr::unchecked("user");
        let mut bank = LedgerBank::new();
        bank.mint(&user, Uint128::new(1_000)).unwrap();
        (vault, bank, user)
    }

    #[test]
    fn test_deposit_mints_one_to_one_on_empty_vault() {
        let (mut vault, mut bank, user) = setup(false);
        let shares = vault.deposit(&mut bank, &user, Uint128::new(600), &user).unwrap();
        assert_eq!(shares, Uint128::new(600));
        assert_eq!(vault.balance_of(&user).unwrap(), Uint128::new(600));
        assert_eq!(bank.balance(&Addr::unchecked("target")), Uint128::new(600));
    }

    #[test]
    fn test_sync_vault_hides_async_extension() {
        let (vault, _, _) = setup(false);
        assert!(vault.as_async().is_none());
        vault.set_async_enabled(true).unwrap();
        assert!(vault.as_async().is_some());
    }

    #[test]
    fn test_request_on_deployed_capital_queues_until_recall() {
        let (mut vault, mut bank, user) = setup(true);
        vault.deposit(&mut bank, &user, Uint128::new(1_000), &user).unwrap();
        vault.deploy(&mut bank, Uint128::new(700)).unwrap();

        let key = vault
            .request_withdraw(&mut bank, &user, Uint128::new(500), &user, &user)
            .unwrap();
        assert!(!key.is_zero());
        // 300 paid on the spot, 200 outstanding
        assert_eq!(bank.balance(&user), Uint128::new(300));
        assert!(!vault.is_claimable(key).unwrap());
        assert_eq!(vault.withdraw_request(key).unwrap().assets, Uint128::new(200));

        vault.recall(&mut bank, Uint128::new(200)).unwrap();
        assert!(vault.is_claimable(key).unwrap());

        let stranger = Addr::unchecked("stranger");
        let paid = vault.claim(&mut bank, &stranger, key).unwrap();
        assert_eq!(paid, Uint128::new(200));
        assert_eq!(bank.balance(&user), Uint128::new(500));
        assert!(vault.withdraw_request(key).unwrap().claimed);
        assert!(!vault.is_claimable(key).unwrap());
        assert!(matches!(
            vault.claim(&mut bank, &stranger, key),
            Err(TargetError::AlreadyClaimed(_))
        ));
    }

    #[test]
    fn test_fully_paid_request_returns_zero_key() {
        let (mut vault, mut bank, user) = setup(true);
        vault.deposit(&mut bank, &user, Uint128::new(1_000), &user).unwrap();
        let key = vault
            .request_withdraw(&mut bank, &user, Uint128::new(400), &user, &user)
            .unwrap();
        assert!(key.is_zero());
        assert_eq!(bank.balance(&user), Uint128::new(400));
    }

    #[test]
    fn test_sync_withdraw_fails_without_idle() {
        let (mut vault, mut bank, user) = setup(false);
        vault.deposit(&mut bank, &user, Uint128::new(1_000), &user).unwrap();
        vault.deploy_all(&mut bank).unwrap();
        let err = vault
            .withdraw(&mut bank, &user, Uint128::new(1), &user, &user)
            .unwrap_err();
        assert!(matches!(err, TargetError::InsufficientLiquidity { .. }));
    }
}
