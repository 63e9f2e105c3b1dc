use cosmwasm_std::Addr;
use meta_vault_types::BPS_SCALE;
use serde::{Deserialize, Serialize};

use crate::VaultError;

/// Static parameters of a meta vault
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSettings {
    /// Account holding the vault's idle assets and its target shares
    pub address: Addr,

    /// Only account allowed to allocate, deallocate and toggle shutdown
    pub curator: Addr,

    /// Fee charged on deposits (basis points)
    pub entry_cost_bps: u64,

    /// Fee charged on withdrawals (basis points)
    pub exit_cost_bps: u64,

    /// Upper bound on simultaneously allocated targets
    pub max_targets: usize,
}

impl VaultSettings {
    pub fn new(address: Addr, curator: Addr) -> Self {
        Self {
            address,
            curator,
            entry_cost_bps: 0,
            exit_cost_bps: 0,
            max_targets: 32,
        }
    }

    pub fn with_costs(mut self, entry_cost_bps: u64, exit_cost_bps: u64) -> Self {
        self.entry_cost_bps = entry_cost_bps;
        self.exit_cost_bps = exit_cost_bps;
        self
    }

    pub fn with_max_targets(mut self, max_targets: usize) -> Self {
        self.max_targets = max_targets;
        self
    }

    pub fn validate(&self) -> Result<(), VaultError> {
        if self.entry_cost_bps > BPS_SCALE || self.exit_cost_bps > BPS_SCALE {
            return Err(VaultError::InvalidSettings(format!(
                "costs must not exceed {} bps",
                BPS_SCALE
            )));
        }
        if self.max_targets == 0 {
            return Err(VaultError::InvalidSettings(
                "max_targets must be positive".to_string(),
            ));
        }
        if self.address == self.curator {
            return Err(VaultError::InvalidSettings(
                "curator must differ from the vault address".to_string(),
            ));
        }
        Ok(())
    }
}
