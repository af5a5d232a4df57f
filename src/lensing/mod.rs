//! Weak-lensing surface density profiles of miscentered clusters.

pub mod miscentering;

pub use miscentering::*;
