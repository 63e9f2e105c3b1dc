use meta_vault_types::{BankError, TargetError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("invalid input length: {left} targets, {right} amounts")]
    InvalidInputLength { left: usize, right: usize },

    #[error("target error: {0}")]
    Target(#[from] TargetError),

    #[error("bank error: {0}")]
    Bank(#[from] BankError),

    #[error("unsupported state version {found}, expected {expected}")]
    UnsupportedStateVersion { found: u16, expected: u16 },

    #[error("ledger invariant violated: {0}")]
    InvariantViolation(String),
}
