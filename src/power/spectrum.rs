//! Tabulated linear matter power spectrum.
//!
//! Inside the table, `P(k)` is a natural cubic spline in `(ln k, ln P)`.
//! Outside it, both ends are continued as power laws through the two
//! outermost points, so integrands that wander past the table (Ogata nodes,
//! large-`k` window tails) stay smooth and positive.

use crate::error::ToolkitError;
use crate::math::{PowerLaw, Spline, fit_power_law, natural_spline};

#[derive(Debug, Clone)]
pub struct LinearPower {
    k: Vec<f64>,
    p: Vec<f64>,
    ln_spline: Spline,
    low: PowerLaw,
    high: PowerLaw,
}

impl LinearPower {
    /// Validate and wrap a `k` [h/Mpc], `P` [(Mpc/h)³] table.
    pub fn new(k: Vec<f64>, p: Vec<f64>) -> Result<Self, ToolkitError> {
        if k.len() != p.len() {
            return Err(ToolkitError::invalid(format!(
                "k and P differ in length ({} vs {})",
                k.len(),
                p.len()
            )));
        }
        if k.len() < 3 {
            return Err(ToolkitError::invalid("power spectrum needs at least 3 points"));
        }
        if let Some(bad) = k.iter().find(|v| !v.is_finite() || **v <= 0.0) {
            return Err(ToolkitError::invalid(format!(
                "wavenumbers must be finite and positive (got {bad})"
            )));
        }
        if let Some(bad) = p.iter().find(|v| !v.is_finite() || **v <= 0.0) {
            return Err(ToolkitError::invalid(format!(
                "power must be finite and positive (got {bad})"
            )));
        }
        if k.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ToolkitError::invalid("wavenumbers must be strictly increasing"));
        }

        let ln_k: Vec<f64> = k.iter().map(|v| v.ln()).collect();
        let ln_p: Vec<f64> = p.iter().map(|v| v.ln()).collect();
        let ln_spline = natural_spline(&ln_k, &ln_p)?;

        let n = k.len();
        let low = fit_power_law(&k[..2], &p[..2])
            .ok_or_else(|| ToolkitError::invalid("cannot fit low-k power-law tail"))?;
        let high = fit_power_law(&k[n - 2..], &p[n - 2..])
            .ok_or_else(|| ToolkitError::invalid("cannot fit high-k power-law tail"))?;

        Ok(Self {
            k,
            p,
            ln_spline,
            low,
            high,
        })
    }

    pub fn k(&self) -> &[f64] {
        &self.k
    }

    pub fn p(&self) -> &[f64] {
        &self.p
    }

    pub fn k_min(&self) -> f64 {
        self.k[0]
    }

    pub fn k_max(&self) -> f64 {
        self.k[self.k.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.k.len()
    }

    pub fn is_empty(&self) -> bool {
        self.k.is_empty()
    }

    /// `P(k)` with power-law extrapolation beyond the table.
    pub fn eval(&self, k: f64) -> f64 {
        if k < self.k_min() {
            self.low.eval(k)
        } else if k > self.k_max() {
            self.high.eval(k)
        } else {
            self.ln_spline.eval(k.ln()).exp()
        }
    }

    /// A copy of this spectrum with every `P` multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Result<Self, ToolkitError> {
        LinearPower::new(self.k.clone(), self.p.iter().map(|v| v * factor).collect())
    }
}
