use cosmwasm_std::{Addr, Uint128};
use meta_vault_types::{AsyncTarget, Bank, ObligationKey, TargetError, TargetHost};
use tracing::{debug, warn};

/// Deposit `assets` from `on_behalf_of` into `target`; returns shares minted
pub fn deposit<H: TargetHost + ?Sized>(
    host: &mut H,
    target: &Addr,
    assets: Uint128,
    on_behalf_of: &Addr,
) -> Result<Uint128, TargetError> {
    let (resolved, bank) = host.target_with_bank(target)?;
    resolved.deposit(bank, on_behalf_of, assets, on_behalf_of)
}

/// File an asynchronous withdrawal, or withdraw synchronously if that fails.
///
/// Returns the target's key, or [`ObligationKey::ZERO`] when the synchronous
/// path settled the withdrawal. The synchronous path runs only after the
/// asynchronous attempt was unavailable or rejected, and its error propagates.
pub fn try_request_withdraw<H: TargetHost + ?Sized>(
    host: &mut H,
    target: &Addr,
    assets: Uint128,
    receiver: &Addr,
    owner: &Addr,
) -> Result<ObligationKey, TargetError> {
    let (resolved, bank) = host.target_with_bank(target)?;

    if let Some(extension) = resolved.as_async_mut() {
        match request_withdraw_within_max(extension, bank, assets, receiver, owner) {
            Ok(key) => return Ok(key),
            Err(e) => debug!(target_vault = %target, error = %e, "async withdraw unavailable, falling back"),
        }
    }

    resolved.withdraw(bank, owner, assets, receiver, owner).map_err(|e| {
        warn!(target_vault = %target, assets = %assets, error = %e, "synchronous withdraw failed");
        e
    })?;
    Ok(ObligationKey::ZERO)
}

/// Share-denominated counterpart of [`try_request_withdraw`]
pub fn try_request_redeem<H: TargetHost + ?Sized>(
    host: &mut H,
    target: &Addr,
    shares: Uint128,
    receiver: &Addr,
    owner: &Addr,
) -> Result<ObligationKey, TargetError> {
    let (resolved, bank) = host.target_with_bank(target)?;

    if let Some(extension) = resolved.as_async_mut() {
        match request_redeem_within_max(extension, bank, shares, receiver, owner) {
            Ok(key) => return Ok(key),
            Err(e) => debug!(target_vault = %target, error = %e, "async redeem unavailable, falling back"),
        }
    }

    resolved.redeem(bank, owner, shares, receiver, owner).map_err(|e| {
        warn!(target_vault = %target, shares = %shares, error = %e, "synchronous redeem failed");
        e
    })?;
    Ok(ObligationKey::ZERO)
}

fn request_withdraw_within_max(
    extension: &mut dyn AsyncTarget,
    bank: &mut dyn Bank,
    assets: Uint128,
    receiver: &Addr,
    owner: &Addr,
) -> Result<ObligationKey, TargetError> {
    let max = extension.max_request_withdraw(owner)?;
    if max < assets {
        return Err(TargetError::ExceedsMaxRequest {
            requested: assets.to_string(),
            max: max.to_string(),
        });
    }
    extension.request_withdraw(bank, owner, assets, receiver, owner)
}

fn request_redeem_within_max(
    extension: &mut dyn AsyncTarget,
    bank: &mut dyn Bank,
    shares: Uint128,
    receiver: &Addr,
    owner: &Addr,
) -> Result<ObligationKey, TargetError> {
    let max = extension.max_request_redeem(owner)?;
    if max < shares {
        return Err(TargetError::ExceedsMaxRequest {
            requested: shares.to_string(),
            max: max.to_string(),
        });
    }
    extension.request_redeem(bank, owner, shares, receiver, owner)
}

/// Collect a settled request; `0` when the target cannot or will not pay
pub fn try_claim<H: TargetHost + ?Sized>(
    host: &mut H,
    target: &Addr,
    key: ObligationKey,
    caller: &Addr,
) -> Uint128 {
    let (resolved, bank) = match host.target_with_bank(target) {
        Ok(pair) => pair,
        Err(e) => {
            debug!(target_vault = %target, key = %key, error = %e, "claim target unreachable");
            return Uint128::zero();
        }
    };
    let Some(extension) = resolved.as_async_mut() else {
        return Uint128::zero();
    };
    match extension.claim(bank, caller, key) {
        Ok(assets) => assets,
        Err(e) => {
            debug!(target_vault = %target, key = %key, error = %e, "claim absorbed");
            Uint128::zero()
        }
    }
}
