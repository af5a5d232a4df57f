//! Matter correlation function from the linear power spectrum.
//!
//! ```text
//! ξ(R) = 1/(2π² R³) ∫_0^∞ x sin x P(x/R) dx
//! ```
//!
//! The sine transform uses Ogata's (2005) double-exponential rule for the
//! zeros of `J_{1/2}`: nodes `x_i = π ψ(t_i)/h`, `t_i = h (i + 1)`,
//! `ψ(t) = t tanh(π/2 sinh t)`.
//!
//! [`xi_mm_exact`] evaluates the same integral directly in `k` with adaptive
//! quadrature over each half period of `sin(kR)`. It is much slower and is
//! kept as a reference for the Ogata rule.

use std::f64::consts::{FRAC_PI_2, PI};

use rayon::prelude::*;

use crate::error::ToolkitError;
use crate::math::Quadrature;
use crate::power::LinearPower;

pub const DEFAULT_OGATA_N: usize = 500;
pub const DEFAULT_OGATA_H: f64 = 0.005;

/// Wavenumber range [h/Mpc] of the direct `ξ_mm` integral.
pub const EXACT_K_MIN: f64 = 5e-8;
pub const EXACT_K_MAX: f64 = 4e3;
/// Relative tolerance of the direct `ξ_mm` integral.
pub const EXACT_EPSREL: f64 = 1.8e-4;

/// Precomputed Ogata nodes and weights for one `(N, h)` pair.
#[derive(Debug, Clone)]
pub struct OgataQuadrature {
    n: usize,
    h: f64,
    x: Vec<f64>,
    /// `x sin x ψ'(t)` at each node.
    weight: Vec<f64>,
}

impl Default for OgataQuadrature {
    fn default() -> Self {
        Self::build(DEFAULT_OGATA_N, DEFAULT_OGATA_H)
    }
}

impl OgataQuadrature {
    pub fn new(n: usize, h: f64) -> Result<Self, ToolkitError> {
        if n == 0 {
            return Err(ToolkitError::invalid("Ogata rule needs at least one node"));
        }
        if !(h.is_finite() && h > 0.0) {
            return Err(ToolkitError::invalid(format!(
                "Ogata step must be finite and positive (got {h})"
            )));
        }
        Ok(Self::build(n, h))
    }

    fn build(n: usize, h: f64) -> Self {
        let mut x = Vec::with_capacity(n);
        let mut weight = Vec::with_capacity(n);
        for i in 0..n {
            let t = h * (i + 1) as f64;
            let psi = t * (FRAC_PI_2 * t.sinh()).tanh();
            let xi = psi * PI / h;
            let pi_sinh_t = PI * t.sinh();
            let mut dpsi = (PI * t * t.cosh() + pi_sinh_t.sinh()) / (1.0 + pi_sinh_t.cosh());
            if dpsi.is_nan() {
                // inf / inf once cosh overflows; the limit is 1.
                dpsi = 1.0;
            }
            x.push(xi);
            weight.push(xi * xi.sin() * dpsi);
        }
        Self { n, h, x, weight }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn h(&self) -> f64 {
        self.h
    }

    /// `ξ_mm` at 3D radius `r` [Mpc/h comoving].
    pub fn xi_mm(&self, r: f64, power: &LinearPower) -> Result<f64, ToolkitError> {
        check_radius(r)?;
        let sum: f64 = self
            .x
            .iter()
            .zip(&self.weight)
            .map(|(&x, &w)| w * power.eval(x / r))
            .sum();
        Ok(sum / (2.0 * PI * r * r * r))
    }

    pub fn xi_mm_arr(&self, radii: &[f64], power: &LinearPower) -> Result<Vec<f64>, ToolkitError> {
        radii.par_iter().map(|&r| self.xi_mm(r, power)).collect()
    }
}

fn check_radius(r: f64) -> Result<(), ToolkitError> {
    if r.is_finite() && r > 0.0 {
        Ok(())
    } else {
        Err(ToolkitError::invalid(format!(
            "radius must be finite and positive (got {r})"
        )))
    }
}

/// `ξ_mm(R) = 1/(2π² R) ∫ k P(k) sin(kR) dk` over `[EXACT_K_MIN, EXACT_K_MAX]`.
pub fn xi_mm_exact(r: f64, power: &LinearPower, quadrature: &Quadrature) -> Result<f64, ToolkitError> {
    check_radius(r)?;
    let integral = quadrature.integrate_sine(|k| k * power.eval(k), r, EXACT_K_MIN, EXACT_K_MAX)?;
    Ok(integral / (2.0 * PI * PI * r))
}

pub fn xi_mm_exact_arr(
    radii: &[f64],
    power: &LinearPower,
    quadrature: &Quadrature,
) -> Result<Vec<f64>, ToolkitError> {
    radii.par_iter().map(|&r| xi_mm_exact(r, power, quadrature)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::log_space;

    fn gaussian_power() -> LinearPower {
        let k = log_space(1e-3, 10.0, 2000).unwrap();
        let p = k.iter().map(|v| (-v * v).exp()).collect();
        LinearPower::new(k, p).unwrap()
    }

    #[test]
    fn reproduces_gaussian_transform() {
        // P = e^{-k²}  =>  ξ(r) = e^{-r²/4} / (8 π^{3/2})
        let pk = gaussian_power();
        let ogata = OgataQuadrature::default();
        for r in [0.5_f64, 1.0, 2.0] {
            let expected = (-r * r / 4.0).exp() / (8.0 * PI.powf(1.5));
            let xi = ogata.xi_mm(r, &pk).unwrap();
            assert!((xi / expected - 1.0).abs() < 1e-3, "r={r}: {xi} vs {expected}");
        }
    }

    #[test]
    fn direct_integral_agrees_with_ogata() {
        let pk = gaussian_power();
        let ogata = OgataQuadrature::default();
        let q = Quadrature::new(0.0, EXACT_EPSREL, 1000);
        let radii = [0.5, 1.0, 2.0];
        let exact = xi_mm_exact_arr(&radii, &pk, &q).unwrap();
        for (r, e) in radii.iter().zip(exact) {
            let expected = (-r * r / 4.0).exp() / (8.0 * PI.powf(1.5));
            assert!((e / expected - 1.0).abs() < 1e-3, "r={r}: {e} vs {expected}");
            let fast = ogata.xi_mm(*r, &pk).unwrap();
            assert!((e / fast - 1.0).abs() < 2e-3, "r={r}: {e} vs {fast}");
        }
        assert!(xi_mm_exact(-1.0, &pk, &q).is_err());
    }

    #[test]
    fn slice_form_matches_scalar_form() {
        let pk = gaussian_power();
        let ogata = OgataQuadrature::new(300, 0.01).unwrap();
        let radii = [0.3, 0.9, 2.7];
        let arr = ogata.xi_mm_arr(&radii, &pk).unwrap();
        for (r, v) in radii.iter().zip(arr) {
            assert_eq!(ogata.xi_mm(*r, &pk).unwrap(), v);
        }
    }

    #[test]
    fn nodes_stay_finite_for_long_rules() {
        let ogata = OgataQuadrature::new(2000, 0.01).unwrap();
        assert!(ogata.weight.iter().all(|w| w.is_finite()));
        assert_eq!(ogata.n(), 2000);
    }

    #[test]
    fn rejects_degenerate_rules() {
        assert!(OgataQuadrature::new(0, 0.005).is_err());
        assert!(OgataQuadrature::new(10, 0.0).is_err());
        assert!(OgataQuadrature::default().xi_mm(0.0, &gaussian_power()).is_err());
    }
}
