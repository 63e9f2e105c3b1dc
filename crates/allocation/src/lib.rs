//! Allocation accounting engine of the meta vault.
//!
//! - [`AllocationState`]: the ledger of allocated targets and outstanding
//!   withdrawal obligations
//! - [`AllocationManager`]: allocate, deallocate and the permissionless claim
//!   sweep, driven through the capability adapter
//! - [`sort_by_exit_cost`]: drain order for withdrawals
//! - views on [`AllocationState`] for allocated, pending and claimable assets

pub mod error;
pub mod events;
pub mod manager;
pub mod priority;
pub mod state;
pub mod views;

pub use error::*;
pub use events::*;
pub use manager::*;
pub use priority::*;
pub use state::*;
pub use views::*;
