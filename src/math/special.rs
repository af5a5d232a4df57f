//! Special functions from `numeris::special`.

use numeris::special::{gamma, gamma_inc};

/// Unnormalised lower incomplete gamma function γ(a, x) = Γ(a) P(a, x).
///
/// Returns NaN outside the domain `a > 0, x >= 0`.
pub fn lower_incomplete_gamma(a: f64, x: f64) -> f64 {
    if !(a > 0.0 && x >= 0.0) {
        return f64::NAN;
    }
    match gamma_inc(a, x) {
        Ok(p) => gamma(a) * p,
        Err(_) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_shape_is_one_minus_exponential() {
        for x in [0.1_f64, 1.0, 3.7, 12.0] {
            let expected = 1.0 - (-x).exp();
            assert!((lower_incomplete_gamma(1.0, x) - expected).abs() < 1e-10, "x={x}");
        }
    }

    #[test]
    fn shape_two_has_closed_form() {
        for x in [0.05_f64, 0.8, 2.5, 9.0] {
            let expected = 1.0 - (1.0 + x) * (-x).exp();
            assert!((lower_incomplete_gamma(2.0, x) - expected).abs() < 1e-10, "x={x}");
        }
    }

    #[test]
    fn large_argument_tends_to_complete_gamma() {
        // Γ(3.5) = 15√π / 8
        let complete = 15.0 * std::f64::consts::PI.sqrt() / 8.0;
        assert!((lower_incomplete_gamma(3.5, 80.0) - complete).abs() < 1e-8);
    }

    #[test]
    fn outside_domain_is_nan() {
        assert!(lower_incomplete_gamma(-1.0, 1.0).is_nan());
        assert!(lower_incomplete_gamma(1.0, -0.5).is_nan());
    }
}
