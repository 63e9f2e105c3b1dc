//! Configuration validation

use crate::{AppConfig, ConfigError, Result};
use std::collections::HashSet;

/// Basis-point denominator; rates above it would exceed 100%
pub const MAX_BPS: u64 = 10_000;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validation error details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate the entire application configuration
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let errors = collect_errors(config);

    if !errors.is_empty() {
        let error_msg = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ConfigError::ValidationError(error_msg));
    }

    Ok(())
}

/// Every problem found in `config`, in field order
pub fn collect_errors(config: &AppConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let vault = &config.vault;

    // Validate vault config
    if vault.address.is_empty() {
        errors.push(ValidationError::new(
            "vault.address",
            "vault address is required",
        ));
    }

    if vault.curator.is_empty() {
        errors.push(ValidationError::new(
            "vault.curator",
            "curator address is required",
        ));
    } else if vault.curator == vault.address {
        errors.push(ValidationError::new(
            "vault.curator",
            "curator must differ from the vault address",
        ));
    }

    if vault.asset_denom.is_empty() {
        errors.push(ValidationError::new(
            "vault.asset_denom",
            "asset denomination is required",
        ));
    }

    if vault.entry_cost_bps > MAX_BPS {
        errors.push(ValidationError::new(
            "vault.entry_cost_bps",
            "must be <= 10000 (100%)",
        ));
    }

    if vault.exit_cost_bps > MAX_BPS {
        errors.push(ValidationError::new(
            "vault.exit_cost_bps",
            "must be <= 10000 (100%)",
        ));
    }

    if vault.max_targets == 0 {
        errors.push(ValidationError::new(
            "vault.max_targets",
            "must be greater than 0",
        ));
    }

    // Validate targets
    let mut seen = HashSet::new();
    for (idx, target) in config.targets.iter().enumerate() {
        if target.address.is_empty() {
            errors.push(ValidationError::new(
                format!("targets[{idx}].address"),
                "target address is required",
            ));
            continue;
        }

        if target.address == vault.address {
            errors.push(ValidationError::new(
                format!("targets[{idx}].address"),
                "the vault cannot target itself",
            ));
        }

        if !seen.insert(target.address.as_str()) {
            errors.push(ValidationError::new(
                format!("targets[{idx}].address"),
                format!("duplicate target '{}'", target.address),
            ));
        }
    }

    let enabled = config.enabled_targets().count();
    if enabled > vault.max_targets {
        errors.push(ValidationError::new(
            "targets",
            format!(
                "{enabled} enabled targets exceed max_targets ({})",
                vault.max_targets
            ),
        ));
    }

    // Validate logging config
    if let Err(e) = validate_log_level(&config.logging.level) {
        errors.push(e);
    }

    errors
}

/// Validate log level
pub fn validate_log_level(level: &str) -> std::result::Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "logging.level",
            format!(
                "invalid log level '{level}', must be one of: {}",
                LOG_LEVELS.join(", ")
            ),
        ))
    }
}
