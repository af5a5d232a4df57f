//! Linear matter power spectrum: validated tables and a synthetic BBKS model.

pub mod bbks;
pub mod spectrum;

pub use bbks::*;
pub use spectrum::*;
