use cosmwasm_std::{Addr, Uint128};
use meta_vault_allocation::AllocationError;
use meta_vault_types::{BankError, MathError, TargetError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    #[error("unauthorized: {caller}")]
    Unauthorized { caller: Addr },

    #[error("vault is shut down")]
    Shutdown,

    #[error("target not eligible: {target}")]
    IneligibleTarget { target: Addr },

    #[error("too many targets: at most {max}")]
    TooManyTargets { max: usize },

    #[error("withdraw of {assets} for {owner} exceeds max {max}")]
    ExceededMaxWithdraw {
        owner: Addr,
        assets: Uint128,
        max: Uint128,
    },

    #[error("redeem of {shares} for {owner} exceeds max {max}")]
    ExceededMaxRedeem {
        owner: Addr,
        shares: Uint128,
        max: Uint128,
    },

    #[error("insufficient shares for {owner}: needed {needed}, available {available}")]
    InsufficientShares {
        owner: Addr,
        needed: Uint128,
        available: Uint128,
    },

    #[error("insufficient liquidity: needed {needed}, available {available}")]
    InsufficientLiquidity { needed: Uint128, available: Uint128 },

    #[error("operation would mint or burn zero shares")]
    ZeroShares,

    #[error("unknown claim: {0}")]
    UnknownClaim(String),

    #[error("claim not ready: {0}")]
    ClaimNotReady(String),

    #[error("invalid vault settings: {0}")]
    InvalidSettings(String),

    #[error("allocation error: {0}")]
    Allocation(#[from] AllocationError),

    #[error("target error: {0}")]
    Target(#[from] TargetError),

    #[error("bank error: {0}")]
    Bank(#[from] BankError),

    #[error("math error: {0}")]
    Math(#[from] MathError),
}
