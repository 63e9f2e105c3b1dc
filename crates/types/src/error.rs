use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("target not found: {0}")]
    NotFound(String),

    #[error("capability not supported: {0}")]
    Unsupported(&'static str),

    #[error("unknown withdraw request: {0}")]
    UnknownRequest(String),

    #[error("request not claimable: {0}")]
    NotClaimable(String),

    #[error("request already claimed: {0}")]
    AlreadyClaimed(String),

    #[error("insufficient shares: needed {needed}, available {available}")]
    InsufficientShares { needed: String, available: String },

    #[error("insufficient liquidity: needed {needed}, available {available}")]
    InsufficientLiquidity { needed: String, available: String },

    #[error("exceeds max request: requested {requested}, max {max}")]
    ExceedsMaxRequest { requested: String, max: String },

    #[error("bank error: {0}")]
    Bank(#[from] BankError),

    #[error("math error: {0}")]
    Math(#[from] MathError),

    #[error("target reverted: {0}")]
    Reverted(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    #[error("insufficient balance for {account}: needed {needed}, available {available}")]
    InsufficientBalance {
        account: String,
        needed: String,
        available: String,
    },

    #[error("balance overflow for {0}")]
    Overflow(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("arithmetic overflow")]
    Overflow,

    #[error("division by zero")]
    DivideByZero,
}
