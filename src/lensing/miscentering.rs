//! Miscentered surface density profiles (McClintock et al. 2018, eqs. 38–40).
//!
//! A centred profile `Σ(R)` is supplied as a table. Between its first and
//! last radius it is a natural cubic spline in `ln R`; inside the first
//! radius the NFW profile of the host halo is used and beyond the last it is
//! zero.

use std::f64::consts::PI;

use rayon::prelude::*;

use crate::domain::MisDistribution;
use crate::error::ToolkitError;
use crate::math::{Quadrature, Spline, natural_spline};
use crate::profile::NfwHalo;

/// Widening of the radial offset integral below the first table radius, in `ln R`.
const LN_R_PAD: f64 = 10.0;

fn quadrature() -> Quadrature {
    Quadrature::new(0.0, 1e-4, 8000)
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

/// A centred `Σ(R)` table with its NFW core.
#[derive(Debug, Clone)]
pub struct SigmaProfile {
    r_min: f64,
    r_max: f64,
    ln_spline: Spline,
    halo: NfwHalo,
}

impl SigmaProfile {
    /// `radii` in Mpc/h comoving, `sigma` in h Msun / pc².
    pub fn new(radii: &[f64], sigma: &[f64], halo: NfwHalo) -> Result<Self, ToolkitError> {
        validate_table(radii, sigma)?;
        let ln_r: Vec<f64> = radii.iter().map(|r| r.ln()).collect();
        Ok(Self {
            r_min: radii[0],
            r_max: radii[radii.len() - 1],
            ln_spline: natural_spline(&ln_r, sigma)?,
            halo,
        })
    }

    pub fn r_min(&self) -> f64 {
        self.r_min
    }

    pub fn r_max(&self) -> f64 {
        self.r_max
    }

    /// Centred `Σ` at projected radius `r`.
    pub fn eval(&self, r: f64) -> f64 {
        if r < self.r_min {
            self.halo.sigma(r)
        } else if r <= self.r_max {
            self.ln_spline.eval(r.ln())
        } else {
            0.0
        }
    }

    /// `Σ` at the distance between a point at `r` and one at `(rc, θ)`.
    fn offset(&self, r: f64, rc: f64, cos_theta: f64) -> f64 {
        let d2 = r * r + rc * rc - 2.0 * r * rc * cos_theta;
        self.eval(d2.max(0.0).sqrt())
    }
}

fn validate_table(radii: &[f64], values: &[f64]) -> Result<(), ToolkitError> {
    if radii.len() != values.len() {
        return Err(ToolkitError::invalid(format!(
            "profile radii and values differ in length ({} vs {})",
            radii.len(),
            values.len()
        )));
    }
    if radii.len() < 3 {
        return Err(ToolkitError::invalid("profile table needs at least 3 radii"));
    }
    if let Some(bad) = radii.iter().find(|r| !r.is_finite() || **r <= 0.0) {
        return Err(ToolkitError::invalid(format!(
            "profile radii must be finite and positive (got {bad})"
        )));
    }
    if radii.windows(2).any(|w| w[1] <= w[0]) {
        return Err(ToolkitError::invalid("profile radii must be strictly increasing"));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ToolkitError::invalid("profile contains non-finite values"));
    }
    Ok(())
}

/// `Σ` of a single cluster whose centre is displaced by `r_mis`:
/// the azimuthal average of the centred profile around the true centre.
pub fn sigma_mis_single(r: f64, profile: &SigmaProfile, r_mis: f64) -> Result<f64, ToolkitError> {
    check_radius(r)?;
    check_radius(r_mis)?;
    let integral = quadrature().integrate(|theta| profile.offset(r, r_mis, theta.cos()), 0.0, PI)?;
    Ok(integral / PI)
}

/// `Σ` averaged over a distribution of centring offsets with scale `r_mis`.
///
/// [`MisDistribution::Single`] is a delta function at `r_mis` and reduces to
/// [`sigma_mis_single`].
pub fn sigma_mis_stack(
    r: f64,
    profile: &SigmaProfile,
    r_mis: f64,
    distribution: MisDistribution,
) -> Result<f64, ToolkitError> {
    let weight: fn(f64, f64) -> f64 = match distribution {
        MisDistribution::Single => return sigma_mis_single(r, profile, r_mis),
        MisDistribution::Rayleigh => |rc, r_mis| (-0.5 * rc * rc / (r_mis * r_mis)).exp(),
        MisDistribution::Exponential => |rc, r_mis| (-rc / r_mis).exp(),
    };
    check_radius(r)?;
    check_radius(r_mis)?;

    let q = quadrature();
    let lo = profile.r_min().ln() - LN_R_PAD;
    let hi = profile.r_max().ln();

    // Radial integral is over ln Rc, hence Rc² rather than Rc.
    // The first inner failure is kept and reported instead of the outer NaN.
    let failure = std::cell::RefCell::new(None);
    let integral = q.integrate(
        |theta| {
            let cos_theta = theta.cos();
            let radial = q.integrate(
                |ln_rc| {
                    let rc = ln_rc.exp();
                    rc * rc * weight(rc, r_mis) * profile.offset(r, rc, cos_theta)
                },
                lo,
                hi,
            );
            match radial {
                Ok(v) => v,
                Err(err) => {
                    let mut slot = failure.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(err);
                    }
                    f64::NAN
                }
            }
        },
        0.0,
        PI,
    );
    if let Some(err) = failure.into_inner() {
        return Err(err);
    }
    Ok(integral? / (PI * r_mis * r_mis))
}

pub fn sigma_mis_stack_arr(
    radii: &[f64],
    profile: &SigmaProfile,
    r_mis: f64,
    distribution: MisDistribution,
) -> Result<Vec<f64>, ToolkitError> {
    radii
        .par_iter()
        .map(|&r| sigma_mis_stack(r, profile, r_mis, distribution))
        .collect()
}

/// Excess surface density `ΔΣ(R) = Σ(<R) - Σ(R)` from a tabulated `Σ`.
///
/// The table is splined in linear `R`. Inside the first radius `Σ` is
/// continued as the power law through the first two points, so
/// `Σ(<R)` includes `∫_0^{R_0} R' Σ dR'` analytically.
#[derive(Debug, Clone)]
pub struct DeltaSigmaTable {
    r0: f64,
    spline: Spline,
    /// `∫_0^{R_0} R Σ(R) dR`
    core: f64,
}

impl DeltaSigmaTable {
    pub fn new(radii: &[f64], sigma: &[f64]) -> Result<Self, ToolkitError> {
        validate_table(radii, sigma)?;
        if sigma[0] <= 0.0 || sigma[1] <= 0.0 {
            return Err(ToolkitError::invalid(
                "the first two profile values must be positive to extrapolate inwards",
            ));
        }
        let slope = (sigma[0] / sigma[1]).ln() / (radii[0] / radii[1]).ln();
        if slope <= -2.0 {
            return Err(ToolkitError::invalid(format!(
                "inner profile slope {slope} makes the enclosed mass diverge"
            )));
        }
        let intercept = sigma[0] * radii[0].powf(-slope);
        let core = intercept * radii[0].powf(slope + 2.0) / (slope + 2.0);

        Ok(Self {
            r0: radii[0],
            spline: natural_spline(radii, sigma)?,
            core,
        })
    }

    pub fn delta_sigma(&self, r: f64) -> Result<f64, ToolkitError> {
        check_radius(r)?;
        let annulus = quadrature().integrate(
            |ln_r| {
                let rr = ln_r.exp();
                rr * rr * self.spline.eval(rr)
            },
            self.r0.ln(),
            r.ln(),
        )?;
        Ok((self.core + annulus) * 2.0 / (r * r) - self.spline.eval(r))
    }
}

/// `ΔΣ` at every radius in `radii` from the table `(table_radii, sigma)`.
pub fn delta_sigma_mis(radii: &[f64], table_radii: &[f64], sigma: &[f64]) -> Result<Vec<f64>, ToolkitError> {
    let table = DeltaSigmaTable::new(table_radii, sigma)?;
    radii.par_iter().map(|&r| table.delta_sigma(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::log_space;

    fn halo() -> NfwHalo {
        NfwHalo {
            mass: 1e14,
            concentration: 5.0,
            delta: 200.0,
            omega_m: 0.3,
        }
    }

    fn nfw_profile() -> SigmaProfile {
        let radii = log_space(0.01, 30.0, 300).unwrap();
        let h = halo();
        let sigma: Vec<f64> = radii.iter().map(|&r| h.sigma(r)).collect();
        SigmaProfile::new(&radii, &sigma, h).unwrap()
    }

    #[test]
    fn delta_sigma_of_inverse_radius_profile_is_the_profile() {
        // Σ = A/R  =>  Σ(<R) = 2A/R  =>  ΔΣ = A/R
        let radii = log_space(0.01, 30.0, 400).unwrap();
        let sigma: Vec<f64> = radii.iter().map(|r| 50.0 / r).collect();
        let points = [0.1, 0.5, 1.0, 5.0, 10.0];
        let ds = delta_sigma_mis(&points, &radii, &sigma).unwrap();
        for (r, got) in points.iter().zip(ds) {
            let expected = 50.0 / r;
            assert!((got / expected - 1.0).abs() < 1e-3, "r={r}: {got} vs {expected}");
        }
    }

    #[test]
    fn small_offset_reproduces_centred_profile() {
        let profile = nfw_profile();
        let h = halo();
        for r in [0.1, 0.5, 2.0] {
            let single = sigma_mis_single(r, &profile, 1e-5).unwrap();
            assert!((single / h.sigma(r) - 1.0).abs() < 1e-4, "single r={r}");

            let stacked = sigma_mis_stack(r, &profile, 1e-3, MisDistribution::Rayleigh).unwrap();
            assert!((stacked / h.sigma(r) - 1.0).abs() < 2e-3, "rayleigh r={r}: {stacked}");

            let stacked = sigma_mis_stack(r, &profile, 1e-3, MisDistribution::Exponential).unwrap();
            assert!((stacked / h.sigma(r) - 1.0).abs() < 5e-3, "exponential r={r}: {stacked}");
        }
    }

    #[test]
    fn single_distribution_in_stack_is_single_offset() {
        let profile = nfw_profile();
        let stacked = sigma_mis_stack(0.4, &profile, 0.2, MisDistribution::Single).unwrap();
        assert_eq!(stacked, sigma_mis_single(0.4, &profile, 0.2).unwrap());
    }

    #[test]
    fn miscentering_flattens_the_core() {
        let profile = nfw_profile();
        let centred = profile.eval(0.05);
        let mis = sigma_mis_stack(0.05, &profile, 0.3, MisDistribution::Exponential).unwrap();
        assert!(mis < centred);
        assert!(mis > 0.0);
    }

    #[test]
    fn profile_falls_back_outside_table() {
        let profile = nfw_profile();
        assert_eq!(profile.eval(0.001), halo().sigma(0.001));
        assert_eq!(profile.eval(31.0), 0.0);
    }

    #[test]
    fn bad_tables_are_rejected() {
        let h = halo();
        assert!(SigmaProfile::new(&[0.1, 0.2], &[1.0, 2.0], h).is_err());
        assert!(SigmaProfile::new(&[0.1, 0.3, 0.2], &[1.0, 2.0, 3.0], h).is_err());
        assert!(SigmaProfile::new(&[0.0, 0.1, 0.2], &[1.0, 2.0, 3.0], h).is_err());
        assert!(SigmaProfile::new(&[0.1, 0.2, 0.3], &[1.0, f64::NAN, 3.0], h).is_err());
        assert!(DeltaSigmaTable::new(&[0.1, 0.2, 0.3], &[8.0, 1.0, 0.5]).is_err());
    }
}
