//! Variance of the linear density field and peak height.
//!
//! ```text
//! σ²(R) = 1/(2π²) ∫ d ln k  k³ P(k) W²(kR)
//! W(x)  = 3 (sin x - x cos x) / x³
//! ν     = δ_c / σ
//! ```
//!
//! The integral runs over the tabulated range `[ln k_min, ln k_max]`.
//! Masses map to radii through the Lagrangian relation
//! `M = 4/3 π Ω_m ρ_m R³`.

use std::f64::consts::PI;

use rayon::prelude::*;

use crate::domain::{DELTA_C, rho_m};
use crate::error::ToolkitError;
use crate::math::Quadrature;
use crate::power::LinearPower;

/// Below this `x`, the top-hat window uses its Taylor series.
const SMALL_X: f64 = 1e-3;

fn quadrature() -> Quadrature {
    Quadrature::new(0.0, 1e-5, 1000)
}

/// Fourier transform of a spherical top-hat.
pub fn top_hat_window(x: f64) -> f64 {
    if x.abs() < SMALL_X {
        // 1 - x²/10 + x⁴/280
        let x2 = x * x;
        return 1.0 - x2 / 10.0 + x2 * x2 / 280.0;
    }
    3.0 * (x.sin() - x * x.cos()) / (x * x * x)
}

/// Lagrangian radius [Mpc/h] enclosing mass `m` [Msun/h] at mean density.
pub fn lagrangian_radius(m: f64, omega_m: f64) -> f64 {
    (m / (4.0 / 3.0 * PI * rho_m(omega_m))).cbrt()
}

/// Mass [Msun/h] enclosed by Lagrangian radius `r` [Mpc/h].
pub fn lagrangian_mass(r: f64, omega_m: f64) -> f64 {
    4.0 / 3.0 * PI * rho_m(omega_m) * r * r * r
}

fn check_positive(name: &str, value: f64) -> Result<(), ToolkitError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ToolkitError::invalid(format!(
            "{name} must be finite and positive (got {value})"
        )))
    }
}

pub fn sigma2_at_r(r: f64, power: &LinearPower) -> Result<f64, ToolkitError> {
    check_positive("radius", r)?;
    let integral = quadrature().integrate(
        |lk| {
            let k = lk.exp();
            let w = top_hat_window(k * r);
            k * k * k * power.eval(k) * w * w
        },
        power.k_min().ln(),
        power.k_max().ln(),
    )?;
    Ok(integral / (2.0 * PI * PI))
}

pub fn sigma2_at_m(m: f64, power: &LinearPower, omega_m: f64) -> Result<f64, ToolkitError> {
    check_positive("mass", m)?;
    check_positive("omega_m", omega_m)?;
    sigma2_at_r(lagrangian_radius(m, omega_m), power)
}

pub fn nu_at_r(r: f64, power: &LinearPower) -> Result<f64, ToolkitError> {
    Ok(DELTA_C / sigma2_at_r(r, power)?.sqrt())
}

pub fn nu_at_m(m: f64, power: &LinearPower, omega_m: f64) -> Result<f64, ToolkitError> {
    Ok(DELTA_C / sigma2_at_m(m, power, omega_m)?.sqrt())
}

pub fn sigma2_at_r_arr(radii: &[f64], power: &LinearPower) -> Result<Vec<f64>, ToolkitError> {
    radii.par_iter().map(|&r| sigma2_at_r(r, power)).collect()
}

pub fn sigma2_at_m_arr(masses: &[f64], power: &LinearPower, omega_m: f64) -> Result<Vec<f64>, ToolkitError> {
    masses
        .par_iter()
        .map(|&m| sigma2_at_m(m, power, omega_m))
        .collect()
}

pub fn nu_at_r_arr(radii: &[f64], power: &LinearPower) -> Result<Vec<f64>, ToolkitError> {
    radii.par_iter().map(|&r| nu_at_r(r, power)).collect()
}

pub fn nu_at_m_arr(masses: &[f64], power: &LinearPower, omega_m: f64) -> Result<Vec<f64>, ToolkitError> {
    masses
        .par_iter()
        .map(|&m| nu_at_m(m, power, omega_m))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BbksConfig;
    use crate::power::bbks;

    #[test]
    fn window_is_continuous_at_series_switch() {
        let below = top_hat_window(SMALL_X * 0.999_999);
        let above = top_hat_window(SMALL_X * 1.000_001);
        assert!((below - above).abs() < 1e-9);
        assert_eq!(top_hat_window(0.0), 1.0);
    }

    #[test]
    fn mass_radius_round_trip() {
        let r = lagrangian_radius(1e14, 0.3);
        assert!((lagrangian_mass(r, 0.3) / 1e14 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn nu_is_delta_c_over_sigma() {
        let pk = bbks(&BbksConfig::default()).unwrap();
        let s2 = sigma2_at_m(1e14, &pk, 0.3).unwrap();
        let nu = nu_at_m(1e14, &pk, 0.3).unwrap();
        assert_eq!(1.686 / s2.sqrt(), nu);

        let s2 = sigma2_at_r(1.0, &pk).unwrap();
        let nu = nu_at_r(1.0, &pk).unwrap();
        assert_eq!(1.686 / s2.sqrt(), nu);
    }

    #[test]
    fn variance_decreases_with_scale() {
        let pk = bbks(&BbksConfig::default()).unwrap();
        let s2 = sigma2_at_r_arr(&[0.5, 1.0, 2.0, 4.0, 8.0, 16.0], &pk).unwrap();
        for w in s2.windows(2) {
            assert!(w[0] > w[1]);
        }
    }

    #[test]
    fn invalid_scales_are_rejected() {
        let pk = bbks(&BbksConfig::default()).unwrap();
        assert!(sigma2_at_r(0.0, &pk).is_err());
        assert!(sigma2_at_m(-1e14, &pk, 0.3).is_err());
        assert!(sigma2_at_m(1e14, &pk, 0.0).is_err());
        assert!(nu_at_r_arr(&[1.0, f64::NAN], &pk).is_err());
    }
}
