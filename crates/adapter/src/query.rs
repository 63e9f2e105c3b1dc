use cosmwasm_std::{Addr, Uint128};
use meta_vault_types::{AsyncTarget, ObligationKey, TargetError, TargetHost};
use tracing::debug;

/// Run a query against the target's async extension, absorbing every failure
fn query_async<H, T, F>(host: &H, target: &Addr, what: &'static str, f: F) -> Option<T>
where
    H: TargetHost + ?Sized,
    F: FnOnce(&dyn AsyncTarget) -> Result<T, TargetError>,
{
    let resolved = match host.target(target) {
        Ok(t) => t,
        Err(e) => {
            debug!(target_vault = %target, query = what, error = %e, "target unreachable");
            return None;
        }
    };
    let extension = resolved.as_async()?;
    match f(extension) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(target_vault = %target, query = what, error = %e, "query absorbed");
            None
        }
    }
}

pub fn try_is_claimable<H: TargetHost + ?Sized>(
    host: &H,
    target: &Addr,
    key: ObligationKey,
) -> bool {
    query_async(host, target, "is_claimable", |t| t.is_claimable(key)).unwrap_or(false)
}

/// Whether the target reports the request behind `key` as delivered
pub fn try_is_claimed<H: TargetHost + ?Sized>(
    host: &H,
    target: &Addr,
    key: ObligationKey,
) -> bool {
    query_async(host, target, "withdraw_request", |t| t.withdraw_request(key))
        .map(|request| request.claimed)
        .unwrap_or(false)
}

pub fn try_idle_assets<H: TargetHost + ?Sized>(host: &H, target: &Addr) -> Uint128 {
    query_async(host, target, "idle_assets", |t| t.idle_assets()).unwrap_or_default()
}

pub fn try_entry_cost<H: TargetHost + ?Sized>(host: &H, target: &Addr) -> u64 {
    query_async(host, target, "entry_cost", |t| t.entry_cost()).unwrap_or(0)
}

pub fn try_exit_cost<H: TargetHost + ?Sized>(host: &H, target: &Addr) -> u64 {
    query_async(host, target, "exit_cost", |t| t.exit_cost()).unwrap_or(0)
}

/// Assets `shares` would realize at `target`.
///
/// Prefers the exact preview and falls back to the linear conversion.
pub fn try_preview_assets<H: TargetHost + ?Sized>(
    host: &H,
    target: &Addr,
    shares: Uint128,
) -> Uint128 {
    if shares.is_zero() {
        return Uint128::zero();
    }
    let resolved = match host.target(target) {
        Ok(t) => t,
        Err(_) => return Uint128::zero(),
    };
    match resolved.preview_redeem(shares) {
        Ok(assets) => assets,
        Err(_) => resolved.convert_to_assets(shares).unwrap_or_else(|e| {
            debug!(target_vault = %target, error = %e, "conversion absorbed");
            Uint128::zero()
        }),
    }
}

/// Share balance of `account` at `target`.
///
/// Unlike the other queries this keeps the error: pruning must only happen
/// on an observed zero, never on a failed read.
pub fn share_balance<H: TargetHost + ?Sized>(
    host: &H,
    target: &Addr,
    account: &Addr,
) -> Result<Uint128, TargetError> {
    host.target(target)?.balance_of(account)
}

/// Share balance with failures read as zero, for valuation only
pub fn try_share_balance<H: TargetHost + ?Sized>(
    host: &H,
    target: &Addr,
    account: &Addr,
) -> Uint128 {
    share_balance(host, target, account).unwrap_or_default()
}
