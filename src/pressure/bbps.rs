//! Battaglia, Bond, Pfrommer & Sievers (2012) gas pressure profile.
//!
//! ```text
//! P(r) = P_Δ P_0 (x/x_c)^γ (1 + (x/x_c)^α)^(-β),   x = r / R_Δ
//! P_Δ  = G M Δ ρ_crit(z) (Ω_b/Ω_m) / (2 R_Δ)
//! ```
//!
//! Halo boundaries here are relative to the critical density at `z`.

use std::f64::consts::PI;

use crate::domain::{G_MPC_MSUN_S, P_TO_Y, RHO_CRIT};
use crate::error::ToolkitError;
use crate::math::Quadrature;
use crate::pressure::abel_transform;

/// Cosmology and halo definition shared by every BBPS evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BbpsHalo {
    /// Msun
    pub mass: f64,
    pub z: f64,
    pub omega_b: f64,
    pub omega_m: f64,
    pub h: f64,
    /// Overdensity with respect to `ρ_crit(z)`.
    pub delta: f64,
}

/// Profile shape parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BbpsParams {
    pub p0: f64,
    pub x_c: f64,
    pub beta: f64,
    pub alpha: f64,
    pub gamma: f64,
}

impl BbpsParams {
    /// Mass and redshift scaling of P_0, x_c and β from Battaglia et al.
    /// (2012), Table 1 (AGN feedback, Δ = 200). α = 1 and γ = -0.3 are fixed.
    pub fn battaglia(mass: f64, z: f64) -> Self {
        let m = mass / 1e14;
        let zp = 1.0 + z;
        Self {
            p0: 18.1 * m.powf(0.154) * zp.powf(-0.758),
            x_c: 0.497 * m.powf(-0.00865) * zp.powf(0.731),
            beta: 4.35 * m.powf(0.0393) * zp.powf(0.415),
            alpha: 1.0,
            gamma: -0.3,
        }
    }
}

/// Critical density at redshift `z` in a flat universe, Msun / Mpc³.
pub fn rho_crit_z(z: f64, omega_m: f64, h: f64) -> f64 {
    let a_inv = 1.0 + z;
    RHO_CRIT * h * h * (omega_m * a_inv * a_inv * a_inv + 1.0 - omega_m)
}

/// Radius enclosing `delta` times the critical density, Mpc.
pub fn r_delta_crit(m: f64, z: f64, omega_m: f64, h: f64, delta: f64) -> f64 {
    let volume = m / (delta * rho_crit_z(z, omega_m, h));
    (3.0 * volume / (4.0 * PI)).cbrt()
}

/// Characteristic pressure `P_Δ`, Msun / (Mpc s²).
pub fn p_delta(halo: &BbpsHalo) -> f64 {
    let rc = rho_crit_z(halo.z, halo.omega_m, halo.h);
    let rd = r_delta_crit(halo.mass, halo.z, halo.omega_m, halo.h, halo.delta);
    G_MPC_MSUN_S * halo.mass * halo.delta * rc * (halo.omega_b / halo.omega_m) / (2.0 * rd)
}

fn check_halo(halo: &BbpsHalo) -> Result<(), ToolkitError> {
    let positive = [
        ("mass", halo.mass),
        ("omega_b", halo.omega_b),
        ("omega_m", halo.omega_m),
        ("h", halo.h),
        ("delta", halo.delta),
    ];
    for (name, value) in positive {
        if !(value.is_finite() && value > 0.0) {
            return Err(ToolkitError::invalid(format!(
                "{name} must be finite and positive (got {value})"
            )));
        }
    }
    if !(halo.z.is_finite() && halo.z > -1.0) {
        return Err(ToolkitError::invalid(format!("redshift must exceed -1 (got {})", halo.z)));
    }
    Ok(())
}

/// Thermal pressure at 3D radius `r` [Mpc].
pub fn p_bbps(r: f64, halo: &BbpsHalo, params: &BbpsParams) -> f64 {
    let rd = r_delta_crit(halo.mass, halo.z, halo.omega_m, halo.h, halo.delta);
    let u = r / rd / params.x_c;
    p_delta(halo) * params.p0 * u.powf(params.gamma) * (1.0 + u.powf(params.alpha)).powf(-params.beta)
}

pub fn p_bbps_arr(radii: &[f64], halo: &BbpsHalo, params: &BbpsParams) -> Result<Vec<f64>, ToolkitError> {
    check_halo(halo)?;
    Ok(radii.iter().map(|&r| p_bbps(r, halo, params)).collect())
}

/// Line-of-sight integrated pressure at projected radius `r`, divided by `1 + z`.
pub fn projected_p_bbps(
    r: f64,
    halo: &BbpsHalo,
    params: &BbpsParams,
    quadrature: &Quadrature,
) -> Result<f64, ToolkitError> {
    check_halo(halo)?;
    let integral = abel_transform(|s| p_bbps(s, halo, params), r, quadrature)?;
    Ok(integral / (1.0 + halo.z))
}

pub fn projected_p_bbps_arr(
    radii: &[f64],
    halo: &BbpsHalo,
    params: &BbpsParams,
    quadrature: &Quadrature,
) -> Result<Vec<f64>, ToolkitError> {
    radii
        .iter()
        .map(|&r| projected_p_bbps(r, halo, params, quadrature))
        .collect()
}

/// Spherical Fourier transform of the pressure profile at wavenumber `k` [1/Mpc]:
/// `4π/k ∫_0^∞ r sin(kr) P(r) dr`.
pub fn fourier_p_bbps(
    k: f64,
    halo: &BbpsHalo,
    params: &BbpsParams,
    quadrature: &Quadrature,
) -> Result<f64, ToolkitError> {
    check_halo(halo)?;
    let integral = quadrature.integrate_sine_upper(|r| r * p_bbps(r, halo, params), k, 0.0)?;
    Ok(4.0 * PI / k * integral)
}

pub fn fourier_p_bbps_arr(
    ks: &[f64],
    halo: &BbpsHalo,
    params: &BbpsParams,
    quadrature: &Quadrature,
) -> Result<Vec<f64>, ToolkitError> {
    ks.iter()
        .map(|&k| fourier_p_bbps(k, halo, params, quadrature))
        .collect()
}

/// Compton-y parameter from a projected pressure.
pub fn compton_y(projected: f64) -> f64 {
    P_TO_Y * projected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn halo() -> BbpsHalo {
        BbpsHalo {
            mass: 1e14,
            z: 0.0,
            omega_b: 0.04,
            omega_m: 0.28,
            h: 0.7,
            delta: 200.0,
        }
    }

    #[test]
    fn critical_density_today() {
        assert!((rho_crit_z(0.0, 0.3, 0.7) / (RHO_CRIT * 0.49) - 1.0).abs() < 1e-14);
        assert!(rho_crit_z(1.0, 0.3, 0.7) > rho_crit_z(0.0, 0.3, 0.7));
    }

    #[test]
    fn boundary_radius_encloses_mass() {
        let h = halo();
        let rd = r_delta_crit(h.mass, 0.5, h.omega_m, h.h, h.delta);
        let mass = 4.0 / 3.0 * PI * rd * rd * rd * h.delta * rho_crit_z(0.5, h.omega_m, h.h);
        assert!((mass / h.mass - 1.0).abs() < 1e-12);
    }

    #[test]
    fn battaglia_fit_at_pivot() {
        let p = BbpsParams::battaglia(1e14, 0.0);
        assert!((p.p0 - 18.1).abs() < 1e-12);
        assert!((p.x_c - 0.497).abs() < 1e-12);
        assert!((p.beta - 4.35).abs() < 1e-12);
        assert_eq!((p.alpha, p.gamma), (1.0, -0.3));
    }

    #[test]
    fn profile_at_core_radius() {
        let h = halo();
        let p = BbpsParams::battaglia(h.mass, h.z);
        let rd = r_delta_crit(h.mass, h.z, h.omega_m, h.h, h.delta);
        let at_core = p_bbps(p.x_c * rd, &h, &p);
        let expected = p_delta(&h) * p.p0 * 2f64.powf(-p.beta);
        assert!((at_core / expected - 1.0).abs() < 1e-12);
    }

    #[test]
    fn projection_is_abel_transform_over_one_plus_z() {
        let mut h = halo();
        h.z = 0.5;
        let p = BbpsParams::battaglia(h.mass, h.z);
        let q = Quadrature::new(0.0, 1e-8, 1000);
        let r = 0.3;
        let direct = abel_transform(|s| p_bbps(s, &h, &p), r, &q).unwrap();
        let projected = projected_p_bbps(r, &h, &p, &q).unwrap();
        assert!((projected * 1.5 / direct - 1.0).abs() < 1e-12);
        assert!(compton_y(projected) > 0.0);
    }

    #[test]
    fn projected_pressure_falls_with_radius() {
        let h = halo();
        let p = BbpsParams::battaglia(h.mass, h.z);
        let q = Quadrature::new(0.0, 1e-6, 1000);
        let proj = projected_p_bbps_arr(&[0.05, 0.2, 0.8, 2.0], &h, &p, &q).unwrap();
        for w in proj.windows(2) {
            assert!(w[0] > w[1]);
        }
    }

    #[test]
    fn fourier_transform_tends_to_volume_integral() {
        let h = halo();
        let p = BbpsParams::battaglia(h.mass, h.z);
        let q = Quadrature::new(0.0, 1e-7, 1000);
        let volume = q
            .integrate_upper(|r| 4.0 * PI * r * r * p_bbps(r, &h, &p), 0.0)
            .unwrap();
        let low_k = fourier_p_bbps(1e-3, &h, &p, &q).unwrap();
        assert!((low_k / volume - 1.0).abs() < 1e-4, "{low_k} vs {volume}");
    }

    #[test]
    fn fourier_transform_falls_with_wavenumber() {
        let h = halo();
        let p = BbpsParams::battaglia(h.mass, h.z);
        let q = Quadrature::new(0.0, 1e-7, 1000);
        let f = fourier_p_bbps_arr(&[0.05, 0.2, 0.5], &h, &p, &q).unwrap();
        assert!(f[2] > 0.0);
        for w in f.windows(2) {
            assert!(w[0] > w[1]);
        }
        assert!(fourier_p_bbps(0.0, &h, &p, &q).is_err());
    }

    #[test]
    fn invalid_halo_is_rejected() {
        let mut h = halo();
        h.omega_m = 0.0;
        let p = BbpsParams::battaglia(1e14, 0.0);
        assert!(projected_p_bbps(0.1, &h, &p, &Quadrature::default()).is_err());
        assert!(p_bbps_arr(&[0.1], &h, &p).is_err());
    }
}
