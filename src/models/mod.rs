//! Halo-profile model parameterisations.
//!
//! The typed [`ModelParams`] is what the rest of the crate consumes; the
//! map-based [`dispatch`] exists for callers that only have named values.

pub mod params;

pub use params::*;
