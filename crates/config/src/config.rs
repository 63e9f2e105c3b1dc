//! Configuration structures for a meta-vault deployment

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// The aggregating vault itself
    pub vault: VaultConfig,

    /// Underlying vaults the curator may allocate into
    #[serde(default)]
    pub targets: Vec<TargetConfig>,

    /// Logging and metrics
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Aggregating vault parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Address the vault holds assets and target shares under
    pub address: String,

    /// Account allowed to allocate and deallocate
    pub curator: String,

    /// Denomination of the single underlying asset
    #[serde(default = "default_asset_denom")]
    pub asset_denom: String,

    /// Fee charged on deposits, in basis points
    #[serde(default)]
    pub entry_cost_bps: u64,

    /// Fee charged on withdrawals, in basis points
    #[serde(default)]
    pub exit_cost_bps: u64,

    /// Upper bound on simultaneously allocated targets
    #[serde(default = "default_max_targets")]
    pub max_targets: usize,
}

/// One underlying vault
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub address: String,

    /// Human readable name used in logs
    #[serde(default)]
    pub label: String,

    /// Disabled targets stay configured but are not eligible for allocation
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON formatted logs
    #[serde(default)]
    pub json: bool,

    /// Enable metrics collection
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

impl AppConfig {
    /// Minimal configuration for the given vault and curator
    pub fn new(address: impl Into<String>, curator: impl Into<String>) -> Self {
        Self {
            vault: VaultConfig {
                address: address.into(),
                curator: curator.into(),
                asset_denom: default_asset_denom(),
                entry_cost_bps: 0,
                exit_cost_bps: 0,
                max_targets: default_max_targets(),
            },
            targets: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }

    /// Targets eligible for allocation, in configured order
    pub fn enabled_targets(&self) -> impl Iterator<Item = &TargetConfig> {
        self.targets.iter().filter(|target| target.enabled)
    }
}

impl TargetConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            label: String::new(),
            enabled: true,
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_asset_denom() -> String {
    "uatom".to_string()
}

fn default_max_targets() -> usize {
    32
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            metrics_enabled: default_true(),
        }
    }
}
