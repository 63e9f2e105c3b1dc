//! Uniform call surface over heterogeneous target vaults.
//!
//! Capability is resolved on every call through [`Target::as_async`], never
//! cached per target, since a target may start or stop offering the
//! request/claim extension at any time.
//!
//! Queries (`try_*` returning plain values) absorb every target failure and
//! degrade to `0` / `false`. Calls with economic side effects ([`deposit`] and
//! the synchronous fallback of [`try_request_withdraw`] / [`try_request_redeem`])
//! propagate the target's error.
//!
//! [`Target::as_async`]: meta_vault_types::Target::as_async

pub mod execute;
pub mod query;

pub use execute::*;
pub use query::*;
