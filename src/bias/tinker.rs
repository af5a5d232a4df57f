//! Tinker et al. (2010) large-scale halo bias.
//!
//! ```text
//! y = log10 Δ
//! b(ν) = 1 - A ν^a / (ν^a + δ_c^a) + B ν^b + C ν^c
//! ```
//!
//! with `A = 1 + 0.24 y e^{-(4/y)^4}`, `a = 0.44 y - 0.88`, `B = 0.183`,
//! `b = 1.5`, `C = 0.019 + 0.107 y + 0.19 e^{-(4/y)^4}`, `c = 2.4`.

use rayon::prelude::*;

use crate::bias::{nu_at_m, nu_at_r};
use crate::domain::{DEFAULT_DELTA, DELTA_C};
use crate::error::ToolkitError;
use crate::power::LinearPower;

/// Bias at peak height `nu` for overdensity `delta` (relative to mean matter density).
pub fn bias_at_nu_delta(nu: f64, delta: f64) -> f64 {
    let y = delta.log10();
    let xp = (-(4.0 / y).powi(4)).exp();
    let big_a = 1.0 + 0.24 * y * xp;
    let a = 0.44 * y - 0.88;
    let big_b = 0.183;
    let b = 1.5;
    let big_c = 0.019 + 0.107 * y + 0.19 * xp;
    let c = 2.4;

    let nu_a = nu.powf(a);
    1.0 - big_a * nu_a / (nu_a + DELTA_C.powf(a)) + big_b * nu.powf(b) + big_c * nu.powf(c)
}

/// Bias at peak height `nu` for Δ = 200.
pub fn bias_at_nu(nu: f64) -> f64 {
    bias_at_nu_delta(nu, DEFAULT_DELTA)
}

pub fn bias_at_r(r: f64, power: &LinearPower) -> Result<f64, ToolkitError> {
    Ok(bias_at_nu(nu_at_r(r, power)?))
}

pub fn bias_at_m(m: f64, power: &LinearPower, omega_m: f64) -> Result<f64, ToolkitError> {
    Ok(bias_at_nu(nu_at_m(m, power, omega_m)?))
}

pub fn bias_at_nu_arr(nus: &[f64]) -> Vec<f64> {
    nus.par_iter().map(|&nu| bias_at_nu(nu)).collect()
}

pub fn bias_at_r_arr(radii: &[f64], power: &LinearPower) -> Result<Vec<f64>, ToolkitError> {
    radii.par_iter().map(|&r| bias_at_r(r, power)).collect()
}

pub fn bias_at_m_arr(masses: &[f64], power: &LinearPower, omega_m: f64) -> Result<Vec<f64>, ToolkitError> {
    masses
        .par_iter()
        .map(|&m| bias_at_m(m, power, omega_m))
        .collect()
}
