//! Line-of-sight projection of spherically symmetric functions.

use rayon::prelude::*;

use crate::error::ToolkitError;
use crate::math::{Quadrature, natural_spline};

/// `∫_{-∞}^{∞} f(√(r² + l²)) dl` at projected radius `r`.
pub fn abel_transform<F>(f: F, r: f64, quadrature: &Quadrature) -> Result<f64, ToolkitError>
where
    F: Fn(f64) -> f64,
{
    if !r.is_finite() || r < 0.0 {
        return Err(ToolkitError::invalid(format!(
            "projected radius must be finite and non-negative (got {r})"
        )));
    }
    quadrature.integrate_infinite(|l| f((r * r + l * l).sqrt()))
}

/// Abel transform at every radius in `rs` of the table `(r_grid, f)`.
///
/// The table is a natural cubic spline in `r`. Inside the first radius the
/// first value is held and beyond the last radius the function is zero.
pub fn abel_transform_interp(
    r_grid: &[f64],
    f: &[f64],
    rs: &[f64],
    quadrature: &Quadrature,
) -> Result<Vec<f64>, ToolkitError> {
    let spline = natural_spline(r_grid, f)?;
    let (r_lo, r_hi) = (r_grid[0], r_grid[r_grid.len() - 1]);
    let table = |s: f64| {
        if s < r_lo {
            f[0]
        } else if s <= r_hi {
            spline.eval(s)
        } else {
            0.0
        }
    };
    rs.par_iter().map(|&r| abel_transform(table, r, quadrature)).collect()
}
