use cosmwasm_std::Addr;
use meta_vault_config::{validate_config, AppConfig, ConfigError};
use meta_vault_orchestrator::{ApprovedTargets, MetaVault, VaultError, VaultSettings};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Vault(#[from] VaultError),
}

/// Settings carried by `config`. Addresses are taken verbatim.
pub fn settings_from_config(config: &AppConfig) -> VaultSettings {
    VaultSettings::new(
        Addr::unchecked(&config.vault.address),
        Addr::unchecked(&config.vault.curator),
    )
    .with_costs(config.vault.entry_cost_bps, config.vault.exit_cost_bps)
    .with_max_targets(config.vault.max_targets)
}

/// Enabled targets of `config`, in configured order
pub fn approved_targets(config: &AppConfig) -> ApprovedTargets {
    config
        .enabled_targets()
        .map(|target| Addr::unchecked(&target.address))
        .collect()
}

/// Validate `config` and build an empty vault from it
pub fn vault_from_config(config: &AppConfig) -> Result<MetaVault, SetupError> {
    validate_config(config)?;
    let approved = approved_targets(config);
    info!(
        vault = %config.vault.address,
        curator = %config.vault.curator,
        denom = %config.vault.asset_denom,
        targets = approved.len(),
        "meta vault configured"
    );
    Ok(MetaVault::new(settings_from_config(config), approved)?)
}
