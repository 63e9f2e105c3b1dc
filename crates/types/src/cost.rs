//! Basis-point cost arithmetic shared by the adapter and the vault.
//!
//! Both directions round up so the protocol never under-charges. Under
//! composition `cost_on_raw(total - cost_on_total(total, r), r)` equals
//! `cost_on_total(total, r)` whenever an integer solution exists; otherwise it
//! falls short by exactly one unit (rates up to 100%).

use cosmwasm_std::{Uint128, Uint256};

use crate::MathError;

/// Denominator of every rate expressed in basis points
pub const BPS_SCALE: u64 = 10_000;

/// `a * b / d`, rounded up, with a 256-bit intermediate
pub fn mul_div_ceil(a: Uint128, b: Uint128, d: Uint128) -> Result<Uint128, MathError> {
    if d.is_zero() {
        return Err(MathError::DivideByZero);
    }
    let product = a.full_mul(b);
    let denom = Uint256::from(d);
    let rounded = product
        .checked_add(denom - Uint256::one())
        .map_err(|_| MathError::Overflow)?;
    let quotient = rounded
        .checked_div(denom)
        .map_err(|_| MathError::DivideByZero)?;
    Uint128::try_from(quotient).map_err(|_| MathError::Overflow)
}

/// `a * b / d`, rounded down
pub fn mul_div_floor(a: Uint128, b: Uint128, d: Uint128) -> Result<Uint128, MathError> {
    a.checked_multiply_ratio(b, d).map_err(|e| match e {
        cosmwasm_std::CheckedMultiplyRatioError::DivideByZero => MathError::DivideByZero,
        cosmwasm_std::CheckedMultiplyRatioError::Overflow => MathError::Overflow,
    })
}

/// Cost to add on top of a net amount to obtain the gross amount
pub fn cost_on_raw(assets: Uint128, rate_bps: u64) -> Result<Uint128, MathError> {
    if rate_bps == 0 {
        return Ok(Uint128::zero());
    }
    mul_div_ceil(
        assets,
        Uint128::from(rate_bps),
        Uint128::from(BPS_SCALE),
    )
}

/// Cost already embedded in a gross amount
pub fn cost_on_total(assets: Uint128, rate_bps: u64) -> Result<Uint128, MathError> {
    if rate_bps == 0 {
        return Ok(Uint128::zero());
    }
    mul_div_ceil(
        assets,
        Uint128::from(rate_bps),
        Uint128::from(rate_bps) + Uint128::from(BPS_SCALE),
    )
}
