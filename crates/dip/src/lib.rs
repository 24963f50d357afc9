//! Umbrella crate for the `dip` workspace.
//!
//! Re-exports the core containers, resampling, classical u8 operations and
//! least-squares fitting so applications can depend on a single crate.

pub use dip_core::*;
pub use dip_fit::*;
pub use dip_ops::*;
pub use dip_resample::*;
