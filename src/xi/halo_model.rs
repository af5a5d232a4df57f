//! Halo-model correlation function: 1-halo profile, 2-halo term and their
//! combination.

use rayon::prelude::*;

use crate::domain::Combination;
use crate::error::ToolkitError;
use crate::models::ModelParams;
use crate::profile::{r_delta, xi_einasto, xi_nfw};

/// `b ξ_mm` at every radius.
pub fn xi_2halo(bias: f64, xi_mm: &[f64]) -> Vec<f64> {
    xi_mm.iter().map(|v| bias * v).collect()
}

/// Combine 1-halo and 2-halo terms radius by radius.
pub fn xi_hm(xi_1h: &[f64], xi_2h: &[f64], combination: Combination) -> Result<Vec<f64>, ToolkitError> {
    if xi_1h.len() != xi_2h.len() {
        return Err(ToolkitError::invalid(format!(
            "1-halo and 2-halo terms differ in length ({} vs {})",
            xi_1h.len(),
            xi_2h.len()
        )));
    }
    let combined = xi_1h
        .iter()
        .zip(xi_2h)
        .map(|(&one, &two)| match combination {
            Combination::Max => one.max(two),
            Combination::Sum => 1.0 + one + two,
        })
        .collect();
    Ok(combined)
}

/// 1-halo correlation function at `r` for the given profile parameters.
///
/// Einasto profiles are described by `r_s`, so the concentration passed to
/// the profile is `R_Δ / r_s` and `ρ_s` is derived from the halo mass.
pub fn one_halo(
    r: f64,
    m: f64,
    model: &ModelParams,
    delta: f64,
    omega_m: f64,
) -> Result<f64, ToolkitError> {
    match *model {
        ModelParams::Nfw { c } => Ok(xi_nfw(r, m, c, delta, omega_m)),
        ModelParams::Einasto { rs, alpha } => {
            let c = r_delta(m, delta, omega_m) / rs;
            Ok(xi_einasto(r, m, None, c, alpha, delta, omega_m))
        }
        ModelParams::None => Err(ToolkitError::invalid(
            "no 1-halo profile selected; pass 'c' for NFW or 'rs' and 'alpha' for Einasto",
        )),
    }
}

pub fn one_halo_arr(
    radii: &[f64],
    m: f64,
    model: &ModelParams,
    delta: f64,
    omega_m: f64,
) -> Result<Vec<f64>, ToolkitError> {
    radii
        .par_iter()
        .map(|&r| one_halo(r, m, model, delta, omega_m))
        .collect()
}
