//! In-memory simulation of the environment a meta vault allocates into.
//!
//! [`Chain`] owns a single-asset [`LedgerBank`] and a set of registered
//! targets. [`SimVault`] is a cloneable handle to a target vault that settles
//! either synchronously or through the request/claim extension, with knobs to
//! deploy capital to a strategy, recall it, and inject failures.

pub mod bank;
pub mod chain;
pub mod vault;

pub use bank::*;
pub use chain::*;
pub use vault::*;
