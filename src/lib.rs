//! `halo-toolkit` library crate.
//!
//! Halo-model building blocks for cluster cosmology: linear-theory bias,
//! 1-halo/2-halo correlation functions, miscentered weak-lensing profiles and
//! BBPS gas pressure. The binary (`halo`) is a thin wrapper around this
//! library so that:
//!
//! - core numerics are testable without spawning processes
//! - the profile and bias functions are reusable from other tools

pub mod app;
pub mod bias;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod lensing;
pub mod math;
pub mod models;
pub mod plot;
pub mod power;
pub mod pressure;
pub mod profile;
pub mod report;
pub mod xi;
