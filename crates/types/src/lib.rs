pub mod cost;
pub mod error;
pub mod host;
pub mod key;
pub mod target;

pub use cost::*;
pub use error::*;
pub use host::*;
pub use key::*;
pub use target::*;

/// Version tag carried by persisted allocation state
pub const STATE_VERSION: u16 = 1;
