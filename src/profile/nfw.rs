//! Navarro–Frenk–White profile: 3D correlation function and projected
//! surface density.

use std::f64::consts::PI;

use crate::domain::rho_m;
use crate::profile::r_delta;

/// Within this distance of `x = 1` the projected profile uses its Taylor expansion.
const NEAR_ONE: f64 = 1e-4;

/// `ln(1 + c) - c / (1 + c)`
fn mass_norm(c: f64) -> f64 {
    (1.0 + c).ln() - c / (1.0 + c)
}

/// NFW halo correlation function `ρ(r)/ρ_m - 1` at 3D radius `r` [Mpc/h comoving].
pub fn xi_nfw(r: f64, m: f64, c: f64, delta: f64, omega_m: f64) -> f64 {
    let rhom = rho_m(omega_m);
    let rs = r_delta(m, delta, omega_m) / c;
    let x = r / rs;
    m / (4.0 * PI * rs * rs * rs * mass_norm(c)) / (x * (1.0 + x) * (1.0 + x)) / rhom - 1.0
}

pub fn xi_nfw_arr(radii: &[f64], m: f64, c: f64, delta: f64, omega_m: f64) -> Vec<f64> {
    radii.iter().map(|&r| xi_nfw(r, m, c, delta, omega_m)).collect()
}

/// Projected NFW surface density at `r` [Mpc/h comoving], in h Msun / pc².
///
/// Wright & Brainerd (2000), eq. 11.
pub fn sigma_nfw(r: f64, m: f64, c: f64, delta: f64, omega_m: f64) -> f64 {
    // Msun h² / Mpc³ -> Msun h² / (pc² Mpc); the line-of-sight length stays in Mpc/h.
    let rhom = rho_m(omega_m) * 1e-12;
    let rs = r_delta(m, delta, omega_m) / c;
    let delta_c = delta / 3.0 * c * c * c / mass_norm(c);
    let sigma0 = 2.0 * rs * delta_c * rhom;

    sigma0 * projected_shape(r / rs)
}

pub fn sigma_nfw_arr(radii: &[f64], m: f64, c: f64, delta: f64, omega_m: f64) -> Vec<f64> {
    radii.iter().map(|&r| sigma_nfw(r, m, c, delta, omega_m)).collect()
}

/// An NFW halo, bundled for callers that evaluate it repeatedly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NfwHalo {
    pub mass: f64,
    pub concentration: f64,
    pub delta: f64,
    pub omega_m: f64,
}

impl NfwHalo {
    pub fn sigma(&self, r: f64) -> f64 {
        sigma_nfw(r, self.mass, self.concentration, self.delta, self.omega_m)
    }
}

fn projected_shape(x: f64) -> f64 {
    let d = x - 1.0;
    if d.abs() < NEAR_ONE {
        return 1.0 / 3.0 - 0.4 * d + 0.3714 * d * d;
    }
    let x2m1 = x * x - 1.0;
    if x < 1.0 {
        let s = (1.0 - x * x).sqrt();
        (1.0 - 2.0 / s * ((1.0 - x) / (1.0 + x)).sqrt().atanh()) / x2m1
    } else {
        let s = x2m1.sqrt();
        (1.0 - 2.0 / s * ((x - 1.0) / (1.0 + x)).sqrt().atan()) / x2m1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Quadrature;

    const M: f64 = 1e14;
    const C: f64 = 5.0;
    const OM: f64 = 0.3;

    #[test]
    fn xi_nfw_encloses_halo_mass() {
        // ∫ 4π r² ρ_m (1 + ξ) dr over [0, R_Δ] must recover M.
        let rd = r_delta(M, 200.0, OM);
        let rhom = rho_m(OM);
        let q = Quadrature::new(0.0, 1e-10, 1000);
        let mass = q
            .integrate(|r| 4.0 * PI * r * r * rhom * (1.0 + xi_nfw(r, M, C, 200.0, OM)), 1e-12, rd)
            .unwrap();
        assert!((mass / M - 1.0).abs() < 1e-6, "mass ratio {}", mass / M);
    }

    #[test]
    fn sigma_nfw_is_continuous_through_scale_radius() {
        let rs = r_delta(M, 200.0, OM) / C;
        let at = sigma_nfw(rs, M, C, 200.0, OM);
        for eps in [5e-5, 2e-4, 1e-3] {
            let lo = sigma_nfw(rs * (1.0 - eps), M, C, 200.0, OM);
            let hi = sigma_nfw(rs * (1.0 + eps), M, C, 200.0, OM);
            assert!(lo > at && at > hi);
            assert!(((lo - hi) / at).abs() < 3.0 * eps);
        }
    }

    #[test]
    fn sigma_nfw_matches_line_of_sight_integral() {
        // Σ(R) = 2 ∫_0^∞ ρ(√(R² + l²)) dl, compared in h Msun / pc².
        let rhom = rho_m(OM);
        let q = Quadrature::new(0.0, 1e-9, 1000);
        for r in [0.05, 0.3, 1.2] {
            let integral = q
                .integrate_upper(|l| rhom * (1.0 + xi_nfw((r * r + l * l).sqrt(), M, C, 200.0, OM)), 0.0)
                .unwrap();
            let expected = 2.0 * integral * 1e-12;
            let sigma = sigma_nfw(r, M, C, 200.0, OM);
            assert!((sigma / expected - 1.0).abs() < 1e-5, "r={r}: {sigma} vs {expected}");
        }
    }
}
