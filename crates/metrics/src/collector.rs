use cosmwasm_std::Uint128;
use lazy_static::lazy_static;
use meta_vault_allocation::{AllocationEvent, ClaimSweep};
use meta_vault_orchestrator::{Accounting, VaultEvent};
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

lazy_static! {
    static ref DEFAULT_METRICS: Option<VaultMetrics> = VaultMetrics::new().ok();
}

/// Process-wide metrics instance, `None` if registration failed
pub fn default_metrics() -> Option<&'static VaultMetrics> {
    DEFAULT_METRICS.as_ref()
}

/// Prometheus metrics for one meta vault
pub struct VaultMetrics {
    registry: Registry,

    // ═══════════════════════════════════════════════════════════════════════════
    // ACTIVITY COUNTERS
    // ═══════════════════════════════════════════════════════════════════════════
    allocations: IntCounter,
    deallocations: IntCounter,
    claims: IntCounter,
    external_claims: IntCounter,

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCOUNTING GAUGES
    // ═══════════════════════════════════════════════════════════════════════════
    pending_assets: IntGauge,
    claimable_assets: IntGauge,
    idle_assets: IntGauge,
}

impl VaultMetrics {
    /// Create the metrics in a fresh registry
    pub fn new() -> Result<Self, MetricsError> {
        Self::with_registry(Registry::new())
    }

    /// Create the metrics in a caller-provided registry
    pub fn with_registry(registry: Registry) -> Result<Self, MetricsError> {
        let metrics = Self {
            allocations: IntCounter::new(
                "meta_vault_allocations_total",
                "Total number of successful allocations into targets",
            )?,
            deallocations: IntCounter::new(
                "meta_vault_deallocations_total",
                "Total number of withdraw or redeem deallocations from targets",
            )?,
            claims: IntCounter::new(
                "meta_vault_claims_total",
                "Total number of pending obligations collected by the vault",
            )?,
            external_claims: IntCounter::new(
                "meta_vault_external_claims_total",
                "Total number of obligations found claimed by a third party",
            )?,
            pending_assets: IntGauge::new(
                "meta_vault_pending_assets",
                "Assets requested from targets and not yet claimable",
            )?,
            claimable_assets: IntGauge::new(
                "meta_vault_claimable_assets",
                "Assets ready to be claimed from targets",
            )?,
            idle_assets: IntGauge::new(
                "meta_vault_idle_assets",
                "Asset balance held by the vault account",
            )?,
            registry,
        };

        metrics.registry.register(Box::new(metrics.allocations.clone()))?;
        metrics.registry.register(Box::new(metrics.deallocations.clone()))?;
        metrics.registry.register(Box::new(metrics.claims.clone()))?;
        metrics.registry.register(Box::new(metrics.external_claims.clone()))?;
        metrics.registry.register(Box::new(metrics.pending_assets.clone()))?;
        metrics.registry.register(Box::new(metrics.claimable_assets.clone()))?;
        metrics.registry.register(Box::new(metrics.idle_assets.clone()))?;

        Ok(metrics)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Count allocations and deallocations among drained vault events.
    ///
    /// Claims are counted by [`VaultMetrics::observe_sweep`] only.
    pub fn observe_events(&self, events: &[VaultEvent]) {
        for event in events {
            match event {
                VaultEvent::Allocation(AllocationEvent::Allocated { .. }) => {
                    self.allocations.inc()
                }
                VaultEvent::Allocation(
                    AllocationEvent::Withdrawn { .. } | AllocationEvent::Redeemed { .. },
                ) => self.deallocations.inc(),
                _ => {}
            }
        }
    }

    /// Record the outcome of a claim sweep
    pub fn observe_sweep(&self, sweep: &ClaimSweep) {
        self.claims.inc_by(sweep.claimed.len() as u64);
        self.external_claims
            .inc_by(sweep.claimed_externally.len() as u64);
    }

    /// Mirror the vault's current accounting snapshot
    pub fn observe_accounting(&self, accounting: &Accounting) {
        self.idle_assets.set(gauge_value(accounting.idle));
        self.pending_assets.set(gauge_value(accounting.pending));
        self.claimable_assets.set(gauge_value(accounting.claimable));
    }

    /// Render every registered metric in the text exposition format
    pub fn gather_text(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| MetricsError::EncodingError(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| MetricsError::EncodingError(e.to_string()))
    }
}

/// Gauges are i64; amounts beyond that saturate
fn gauge_value(amount: Uint128) -> i64 {
    i64::try_from(amount.u128()).unwrap_or(i64::MAX)
}

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("encoding error: {0}")]
    EncodingError(String),
    #[error("registry error: {0}")]
    RegistryError(#[from] prometheus::Error),
}
