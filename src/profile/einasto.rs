//! Einasto profile.
//!
//! ```text
//! ρ(r) = ρ_s exp(-2/α (r/r_s)^α)
//! ```
//!
//! `ρ_s` is fixed by requiring the mass inside `R_Δ` to equal `M`.

use crate::domain::rho_m;
use crate::math::lower_incomplete_gamma;
use crate::profile::r_delta;

/// Normalisation `ρ_s` [Msun h² / Mpc³] for concentration `c = R_Δ / r_s`.
pub fn rhos_einasto(m: f64, c: f64, alpha: f64, delta: f64, omega_m: f64) -> f64 {
    let rd = r_delta(m, delta, omega_m);
    let rs = rd / c;
    let a = 3.0 / alpha;
    let x = 2.0 / alpha * c.powf(alpha);
    let num = delta * rho_m(omega_m) * rd * rd * rd * alpha * (2.0 / alpha).powf(a);
    num / (3.0 * rs * rs * rs * lower_incomplete_gamma(a, x))
}

/// Einasto correlation function at `r` [Mpc/h comoving].
///
/// When `rhos` is `None` it is derived with [`rhos_einasto`].
pub fn xi_einasto(
    r: f64,
    m: f64,
    rhos: Option<f64>,
    c: f64,
    alpha: f64,
    delta: f64,
    omega_m: f64,
) -> f64 {
    let rhos = rhos.unwrap_or_else(|| rhos_einasto(m, c, alpha, delta, omega_m));
    let rs = r_delta(m, delta, omega_m) / c;
    rhos / rho_m(omega_m) * (-2.0 / alpha * (r / rs).powf(alpha)).exp() - 1.0
}

pub fn xi_einasto_arr(
    radii: &[f64],
    m: f64,
    rhos: Option<f64>,
    c: f64,
    alpha: f64,
    delta: f64,
    omega_m: f64,
) -> Vec<f64> {
    let rhos = rhos.unwrap_or_else(|| rhos_einasto(m, c, alpha, delta, omega_m));
    radii
        .iter()
        .map(|&r| xi_einasto(r, m, Some(rhos), c, alpha, delta, omega_m))
        .collect()
}
