//! Aggregating meta vault.
//!
//! Depositors hold shares of a single vault whose curator allocates the
//! underlying asset across target vaults. Targets may settle withdrawals later;
//! the vault tracks those obligations, collects them with a permissionless
//! sweep and routes user withdrawals across its own idle, target idle and
//! deferred claims.
//!
//! This crate re-exports the workspace crates and wires configuration into a
//! ready [`MetaVault`].

pub mod setup;

pub use meta_vault_adapter as adapter;
pub use meta_vault_allocation as allocation;
pub use meta_vault_config as config;
pub use meta_vault_metrics as metrics;
pub use meta_vault_orchestrator as orchestrator;
pub use meta_vault_types as types;

pub use meta_vault_allocation::{AllocationManager, AllocationState};
pub use meta_vault_orchestrator::{ApprovedTargets, MetaVault, VaultError, VaultSettings};
pub use meta_vault_types::{ObligationKey, TargetHost};
pub use setup::{approved_targets, settings_from_config, vault_from_config, SetupError};
