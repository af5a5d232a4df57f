//! Matter and halo-model correlation functions.

pub mod halo_model;
pub mod matter;

pub use halo_model::*;
pub use matter::*;
