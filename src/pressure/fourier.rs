//! Spherical (3D, isotropic) Fourier transforms of tabulated profiles.
//!
//! ```text
//! F(k) = 4π/k ∫_0^∞ r f(r) sin(kr) dr
//! f(r) = 1/(2π² r) ∫_0^∞ k F(k) sin(kr) dk
//! ```
//!
//! Tables are interpolated linearly. Below the first point the first value
//! is held; beyond the last point the function is zero, so both integrals
//! end at the last tabulated abscissa.

use std::f64::consts::PI;

use rayon::prelude::*;

use crate::error::ToolkitError;
use crate::math::{Linear, Quadrature, linear_interp};

struct Table {
    first: (f64, f64),
    last: f64,
    interp: Linear,
}

impl Table {
    fn new(x: &[f64], y: &[f64]) -> Result<Self, ToolkitError> {
        let interp = linear_interp(x, y)?;
        if x[0] < 0.0 {
            return Err(ToolkitError::invalid(format!(
                "transform abscissae must be non-negative (got {})",
                x[0]
            )));
        }
        Ok(Self {
            first: (x[0], y[0]),
            last: x[x.len() - 1],
            interp,
        })
    }

    fn eval(&self, x: f64) -> f64 {
        if x <= self.first.0 {
            self.first.1
        } else if x <= self.last {
            self.interp.eval(x)
        } else {
            0.0
        }
    }
}

fn check_output(points: &[f64], name: &str) -> Result<(), ToolkitError> {
    match points.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
        Some(bad) => Err(ToolkitError::invalid(format!(
            "{name} must be finite and positive (got {bad})"
        ))),
        None => Ok(()),
    }
}

/// `F(k)` at every `k` in `ks` from the profile table `(rs, fs)`.
pub fn forward_spherical_fourier_transform(
    ks: &[f64],
    rs: &[f64],
    fs: &[f64],
    quadrature: &Quadrature,
) -> Result<Vec<f64>, ToolkitError> {
    check_output(ks, "wavenumbers")?;
    let table = Table::new(rs, fs)?;
    ks.par_iter()
        .map(|&k| {
            let integral = quadrature.integrate_sine(|r| r * table.eval(r), k, 0.0, table.last)?;
            Ok(4.0 * PI / k * integral)
        })
        .collect()
}

/// `f(r)` at every `r` in `rs` from the transform table `(ks, big_f)`.
pub fn inverse_spherical_fourier_transform(
    rs: &[f64],
    ks: &[f64],
    big_f: &[f64],
    quadrature: &Quadrature,
) -> Result<Vec<f64>, ToolkitError> {
    check_output(rs, "radii")?;
    let table = Table::new(ks, big_f)?;
    rs.par_iter()
        .map(|&r| {
            let integral = quadrature.integrate_sine(|k| k * table.eval(k), r, 0.0, table.last)?;
            Ok(integral / (2.0 * PI * PI * r))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::log_space;

    // f(r) = e^{-r²}  <->  F(k) = π^{3/2} e^{-k²/4}
    fn gaussian(r: f64) -> f64 {
        (-r * r).exp()
    }

    fn gaussian_transform(k: f64) -> f64 {
        PI.powf(1.5) * (-0.25 * k * k).exp()
    }

    fn quadrature() -> Quadrature {
        Quadrature::new(0.0, 1e-6, 1000)
    }

    #[test]
    fn forward_transform_of_gaussian() {
        let rs = log_space(1e-3, 10.0, 2000).unwrap();
        let fs: Vec<f64> = rs.iter().map(|&r| gaussian(r)).collect();
        let ks = [0.5, 1.0, 2.0];
        let got = forward_spherical_fourier_transform(&ks, &rs, &fs, &quadrature()).unwrap();
        for (k, g) in ks.iter().zip(got) {
            let expected = gaussian_transform(*k);
            assert!((g / expected - 1.0).abs() < 1e-4, "k={k}: {g} vs {expected}");
        }
    }

    #[test]
    fn inverse_transform_of_gaussian() {
        let ks = log_space(1e-3, 20.0, 2000).unwrap();
        let big_f: Vec<f64> = ks.iter().map(|&k| gaussian_transform(k)).collect();
        let rs = [0.25, 0.5, 1.0];
        let got = inverse_spherical_fourier_transform(&rs, &ks, &big_f, &quadrature()).unwrap();
        for (r, g) in rs.iter().zip(got) {
            assert!((g / gaussian(*r) - 1.0).abs() < 1e-3, "r={r}: {g}");
        }
    }

    #[test]
    fn forward_then_inverse_recovers_profile() {
        let q = quadrature();
        let rs = log_space(1e-3, 10.0, 2000).unwrap();
        let fs: Vec<f64> = rs.iter().map(|&r| gaussian(r)).collect();
        let ks = log_space(1e-3, 20.0, 400).unwrap();
        let big_f = forward_spherical_fourier_transform(&ks, &rs, &fs, &q).unwrap();
        let back = inverse_spherical_fourier_transform(&[0.5, 1.0], &ks, &big_f, &q).unwrap();
        assert!((back[0] / gaussian(0.5) - 1.0).abs() < 2e-3, "{}", back[0]);
        assert!((back[1] / gaussian(1.0) - 1.0).abs() < 2e-3, "{}", back[1]);
    }

    #[test]
    fn table_holds_first_value_and_vanishes_past_the_end() {
        let table = Table::new(&[0.5, 1.0, 2.0], &[4.0, 2.0, 1.0]).unwrap();
        assert_eq!(table.eval(0.1), 4.0);
        assert!((table.eval(1.5) - 1.5).abs() < 1e-12);
        assert_eq!(table.eval(2.5), 0.0);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let q = Quadrature::default();
        let rs = [0.1, 0.2, 0.3];
        let fs = [1.0, 0.5, 0.25];
        assert!(forward_spherical_fourier_transform(&[0.0], &rs, &fs, &q).is_err());
        assert!(forward_spherical_fourier_transform(&[1.0], &rs, &fs[..2], &q).is_err());
        assert!(inverse_spherical_fourier_transform(&[-1.0], &rs, &fs, &q).is_err());
        assert!(Table::new(&[-0.1, 0.2, 0.3], &fs).is_err());
    }
}
