use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};

use crate::{Bank, ObligationKey, TargetError};

/// Request record kept by an asynchronous target for each issued key
#[cw_serde]
pub struct WithdrawRequest {
    /// Account whose shares were burned for this request
    pub owner: Addr,
    /// Account that receives the assets at claim time
    pub receiver: Addr,
    /// Assets still owed when the request was filed
    pub assets: Uint128,
    /// Set once the assets have been delivered
    pub claimed: bool,
}

/// Synchronous vault surface every target exposes.
///
/// State-changing calls move assets through the supplied [`Bank`] and act on
/// behalf of `caller`. Asynchronous settlement is an optional extension
/// discovered per call through [`Target::as_async`].
pub trait Target {
    /// Deposit assets from `caller`, minting shares to `receiver`
    fn deposit(
        &mut self,
        bank: &mut dyn Bank,
        caller: &Addr,
        assets: Uint128,
        receiver: &Addr,
    ) -> Result<Uint128, TargetError>;

    /// Burn `owner`'s shares and send exactly `assets` to `receiver`; returns shares burned
    fn withdraw(
        &mut self,
        bank: &mut dyn Bank,
        caller: &Addr,
        assets: Uint128,
        receiver: &Addr,
        owner: &Addr,
    ) -> Result<Uint128, TargetError>;

    /// Burn exactly `shares` of `owner` and send the assets to `receiver`; returns assets sent
    fn redeem(
        &mut self,
        bank: &mut dyn Bank,
        caller: &Addr,
        shares: Uint128,
        receiver: &Addr,
        owner: &Addr,
    ) -> Result<Uint128, TargetError>;

    fn balance_of(&self, account: &Addr) -> Result<Uint128, TargetError>;

    fn convert_to_assets(&self, shares: Uint128) -> Result<Uint128, TargetError>;

    fn preview_redeem(&self, _shares: Uint128) -> Result<Uint128, TargetError> {
        Err(TargetError::Unsupported("preview_redeem"))
    }

    /// Asynchronous request/claim extension, if currently offered
    fn as_async(&self) -> Option<&dyn AsyncTarget> {
        None
    }

    fn as_async_mut(&mut self) -> Option<&mut dyn AsyncTarget> {
        None
    }
}

/// Request/claim extension of a target whose withdrawals may settle later
pub trait AsyncTarget {
    fn max_request_withdraw(&self, owner: &Addr) -> Result<Uint128, TargetError>;

    fn max_request_redeem(&self, owner: &Addr) -> Result<Uint128, TargetError>;

    /// File a withdrawal for `assets`. Whatever can be paid right away is sent
    /// to `receiver` during the call; the returned key tracks the remainder and
    /// is [`ObligationKey::ZERO`] when nothing remains owed.
    fn request_withdraw(
        &mut self,
        bank: &mut dyn Bank,
        caller: &Addr,
        assets: Uint128,
        receiver: &Addr,
        owner: &Addr,
    ) -> Result<ObligationKey, TargetError>;

    fn request_redeem(
        &mut self,
        bank: &mut dyn Bank,
        caller: &Addr,
        shares: Uint128,
        receiver: &Addr,
        owner: &Addr,
    ) -> Result<ObligationKey, TargetError>;

    /// Deliver a settled request to its receiver. Anyone may call this.
    fn claim(
        &mut self,
        bank: &mut dyn Bank,
        caller: &Addr,
        key: ObligationKey,
    ) -> Result<Uint128, TargetError>;

    fn is_claimable(&self, key: ObligationKey) -> Result<bool, TargetError>;

    fn withdraw_request(&self, key: ObligationKey) -> Result<WithdrawRequest, TargetError>;

    /// Assets the target could pay out synchronously right now
    fn idle_assets(&self) -> Result<Uint128, TargetError>;

    /// Entry cost in basis points
    fn entry_cost(&self) -> Result<u64, TargetError>;

    /// Exit cost in basis points
    fn exit_cost(&self) -> Result<u64, TargetError>;
}
