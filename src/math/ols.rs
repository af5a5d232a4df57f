//! Least squares helpers.
//!
//! Power-law tails show up in a few places (power spectrum extrapolation, the
//! inner part of a tabulated Σ(R) profile). We fit them as straight lines in
//! log-log space:
//!
//! ```text
//! ln y = ln A + n ln x
//! ```
//!
//! With two points this reproduces the exact two-point slope; with more points
//! it is an ordinary least squares fit.

use nalgebra::{DMatrix, DVector};

/// A fitted power law `y = amplitude * x^slope`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLaw {
    pub amplitude: f64,
    pub slope: f64,
}

impl PowerLaw {
    pub fn eval(&self, x: f64) -> f64 {
        self.amplitude * x.powf(self.slope)
    }
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y = A x^n` through the given points.
///
/// All values must be finite and strictly positive; returns `None` otherwise or
/// when fewer than two distinct abscissae are supplied.
pub fn fit_power_law(xs: &[f64], ys: &[f64]) -> Option<PowerLaw> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    if xs
        .iter()
        .chain(ys.iter())
        .any(|v| !v.is_finite() || *v <= 0.0)
    {
        return None;
    }

    let n = xs.len();
    let mut design = DMatrix::<f64>::zeros(n, 2);
    let mut rhs = DVector::<f64>::zeros(n);
    for i in 0..n {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = xs[i].ln();
        rhs[i] = ys[i].ln();
    }

    let beta = solve_least_squares(&design, &rhs)?;
    Some(PowerLaw {
        amplitude: beta[0].exp(),
        slope: beta[1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn two_point_power_law_is_exact() {
        let law = fit_power_law(&[1.0, 4.0], &[3.0, 48.0]).unwrap();
        assert!((law.slope - 2.0).abs() < 1e-10);
        assert!((law.amplitude - 3.0).abs() < 1e-10);
        assert!((law.eval(2.0) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn power_law_rejects_non_positive_values() {
        assert!(fit_power_law(&[1.0, 2.0], &[1.0, -1.0]).is_none());
        assert!(fit_power_law(&[1.0], &[1.0]).is_none());
    }
}
