//! Metrics and logging for the meta-vault allocation engine
//!
//! # Features
//!
//! - Prometheus counters for allocation, deallocation and claim activity
//! - Gauges mirroring the vault's idle, pending and claimable assets
//! - Tracing subscriber setup with plain or JSON output
//!
//! # Example
//!
//! ```no_run
//! use meta_vault_metrics::{init_tracing, VaultMetrics};
//!
//! init_tracing("info", false).unwrap();
//! let metrics = VaultMetrics::new().unwrap();
//! println!("{}", metrics.gather_text().unwrap());
//! ```

pub mod collector;
pub mod logging;

pub use collector::{default_metrics, MetricsError, VaultMetrics};
pub use logging::{init_tracing, TracingError};
