//! Synthetic linear power spectrum from the BBKS transfer function.
//!
//! Bardeen, Bond, Kaiser & Szalay (1986):
//!
//! ```text
//! q    = k / Γ,  Γ = Ω_m h            (k in h/Mpc)
//! T(q) = ln(1 + 2.34 q) / (2.34 q)
//!        × [1 + 3.89 q + (16.1 q)² + (5.46 q)³ + (6.71 q)⁴]^(-1/4)
//! P(k) = A k^{n_s} T²
//! ```
//!
//! `A` is fixed by requiring `σ(R = 8 Mpc/h) = σ8`. This is only meant as a
//! stand-in when no Boltzmann-code table is at hand.

use log::debug;

use crate::bias::sigma2_at_r;
use crate::domain::BbksConfig;
use crate::error::ToolkitError;
use crate::math::log_space;
use crate::power::LinearPower;

/// Radius at which σ8 is defined, Mpc/h.
const SIGMA8_RADIUS: f64 = 8.0;

/// BBKS transfer function at wavenumber `k` [h/Mpc] for shape parameter `gamma`.
pub fn bbks_transfer(k: f64, gamma: f64) -> f64 {
    let q = k / gamma;
    if q < 1e-8 {
        return 1.0;
    }
    let poly = 1.0 + 3.89 * q + (16.1 * q).powi(2) + (5.46 * q).powi(3) + (6.71 * q).powi(4);
    (1.0 + 2.34 * q).ln() / (2.34 * q) * poly.powf(-0.25)
}

/// Build a σ8-normalised BBKS spectrum on a log-spaced `k` grid.
pub fn bbks(config: &BbksConfig) -> Result<LinearPower, ToolkitError> {
    if !(config.omega_m > 0.0 && config.h > 0.0 && config.sigma8 > 0.0 && config.n_s.is_finite()) {
        return Err(ToolkitError::invalid(format!(
            "invalid BBKS parameters: omega_m={}, h={}, n_s={}, sigma8={}",
            config.omega_m, config.h, config.n_s, config.sigma8
        )));
    }
    let gamma = config.omega_m * config.h;
    let k = log_space(config.k_min, config.k_max, config.n_k)?;
    let p: Vec<f64> = k
        .iter()
        .map(|&kk| kk.powf(config.n_s) * bbks_transfer(kk, gamma).powi(2))
        .collect();

    let raw = LinearPower::new(k, p)?;
    let s2 = sigma2_at_r(SIGMA8_RADIUS, &raw)?;
    let amplitude = config.sigma8 * config.sigma8 / s2;
    debug!("BBKS normalisation: gamma={gamma:.4} raw sigma8^2={s2:e} amplitude={amplitude:e}");

    raw.scaled(amplitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_function_limits() {
        assert!((bbks_transfer(0.0, 0.21) - 1.0).abs() < 1e-12);
        assert!((bbks_transfer(1e-6, 0.21) - 1.0).abs() < 1e-3);
        assert!(bbks_transfer(10.0, 0.21) < 1e-2);
    }

    #[test]
    fn spectrum_is_normalised_to_sigma8() {
        let config = BbksConfig::default();
        let pk = bbks(&config).unwrap();
        let s8 = sigma2_at_r(8.0, &pk).unwrap().sqrt();
        assert!((s8 - config.sigma8).abs() < 1e-3, "sigma8={s8}");
    }

    #[test]
    fn rejects_unphysical_parameters() {
        let config = BbksConfig {
            omega_m: -0.3,
            ..BbksConfig::default()
        };
        assert!(bbks(&config).is_err());
    }
}
