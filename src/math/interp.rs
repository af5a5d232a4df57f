//! Tabulated-function interpolation on top of `numeris::interp`.
//!
//! Tables are validated here so that every caller reports the same messages:
//! equal lengths, at least three knots, finite values and strictly
//! increasing abscissae.

use std::fmt;
use std::sync::Arc;

use numeris::interp::{DynCubicSpline, DynLinearInterp};

use crate::error::ToolkitError;

/// Natural cubic spline (zero curvature at both ends).
#[derive(Clone)]
pub struct Spline {
    inner: Arc<DynCubicSpline<f64>>,
    knots: usize,
}

impl Spline {
    pub fn eval(&self, x: f64) -> f64 {
        self.inner.eval(x)
    }
}

impl fmt::Debug for Spline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spline").field("knots", &self.knots).finish()
    }
}

/// Piecewise-linear interpolant.
#[derive(Clone)]
pub struct Linear {
    inner: Arc<DynLinearInterp<f64>>,
    knots: usize,
}

impl Linear {
    pub fn eval(&self, x: f64) -> f64 {
        self.inner.eval(x)
    }
}

impl fmt::Debug for Linear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Linear").field("knots", &self.knots).finish()
    }
}

pub(crate) fn validate_knots(x: &[f64], y: &[f64]) -> Result<(), ToolkitError> {
    if x.len() != y.len() {
        return Err(ToolkitError::invalid(format!(
            "spline knots and values differ in length ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 3 {
        return Err(ToolkitError::invalid("spline needs at least 3 knots"));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(ToolkitError::invalid("spline input contains non-finite values"));
    }
    if x.windows(2).any(|w| w[1] <= w[0]) {
        return Err(ToolkitError::invalid("spline knots must be strictly increasing"));
    }
    Ok(())
}

/// Natural cubic spline through `(x[i], y[i])`.
pub fn natural_spline(x: &[f64], y: &[f64]) -> Result<Spline, ToolkitError> {
    validate_knots(x, y)?;
    let inner = DynCubicSpline::new(x.to_vec(), y.to_vec())
        .map_err(|e| ToolkitError::invalid(format!("cannot build spline: {e:?}")))?;
    Ok(Spline {
        inner: Arc::new(inner),
        knots: x.len(),
    })
}

/// Linear interpolant through `(x[i], y[i])`.
pub fn linear_interp(x: &[f64], y: &[f64]) -> Result<Linear, ToolkitError> {
    validate_knots(x, y)?;
    let inner = DynLinearInterp::new(x.to_vec(), y.to_vec())
        .map_err(|e| ToolkitError::invalid(format!("cannot build interpolant: {e:?}")))?;
    Ok(Linear {
        inner: Arc::new(inner),
        knots: x.len(),
    })
}

/// `∫_a^b s(x) dx` of the natural cubic spline through `(xs, ys)`.
///
/// Both limits must lie inside the table. Each knot interval is a cubic, so
/// Simpson's rule on it is exact.
pub fn integrate_spline(xs: &[f64], ys: &[f64], a: f64, b: f64) -> Result<f64, ToolkitError> {
    let spline = natural_spline(xs, ys)?;
    let (lo, hi) = (xs[0], xs[xs.len() - 1]);
    for (name, v) in [("lower", a), ("upper", b)] {
        if !(v >= lo && v <= hi) {
            return Err(ToolkitError::invalid(format!(
                "{name} limit {v} outside the table [{lo}, {hi}]"
            )));
        }
    }
    if a == b {
        return Ok(0.0);
    }
    let (from, to, sign) = if a < b { (a, b, 1.0) } else { (b, a, -1.0) };

    let mut edges = vec![from];
    edges.extend(xs.iter().copied().filter(|&x| x > from && x < to));
    edges.push(to);

    let total: f64 = edges
        .windows(2)
        .map(|w| {
            let (x0, x1) = (w[0], w[1]);
            let mid = 0.5 * (x0 + x1);
            (x1 - x0) / 6.0 * (spline.eval(x0) + 4.0 * spline.eval(mid) + spline.eval(x1))
        })
        .sum();
    Ok(sign * total)
}
