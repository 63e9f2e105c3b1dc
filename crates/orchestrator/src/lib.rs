//! The meta vault: depositors' shares, withdrawal routing across targets and
//! claim handles for withdrawals that targets settle later.
//!
//! [`MetaVault`] owns the allocation ledger and drives every target
//! interaction through an [`meta_vault_allocation::AllocationManager`].

pub mod claims;
pub mod eligibility;
pub mod error;
pub mod events;
pub mod routing;
pub mod settings;
pub mod shares;
pub mod vault;

pub use claims::{ClaimPart, UserClaim, UserClaims};
pub use eligibility::{ApprovedTargets, TargetEligibility};
pub use error::VaultError;
pub use events::VaultEvent;
pub use routing::{Route, RoutePhase};
pub use settings::VaultSettings;
pub use shares::{Rounding, ShareLedger};
pub use vault::{Accounting, MetaVault, WithdrawOutcome};
