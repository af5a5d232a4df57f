//! Thermal gas pressure profiles, their line-of-sight projections and
//! spherical Fourier transforms.

pub mod abel;
pub mod bbps;
pub mod fourier;

pub use abel::*;
pub use bbps::*;
pub use fourier::*;
