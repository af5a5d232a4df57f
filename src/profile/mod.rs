//! Halo density profiles expressed as correlation functions `ρ/ρ_m - 1`.

pub mod dk;
pub mod einasto;
pub mod nfw;

use std::f64::consts::PI;

use crate::domain::rho_m;

pub use dk::*;
pub use einasto::*;
pub use nfw::*;

/// Halo boundary radius [Mpc/h comoving] enclosing `delta` times the mean matter density.
pub fn r_delta(m: f64, delta: f64, omega_m: f64) -> f64 {
    (m / (4.0 / 3.0 * PI * rho_m(omega_m) * delta)).cbrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_radius_scales_with_mass() {
        let r1 = r_delta(1e14, 200.0, 0.3);
        let r8 = r_delta(8e14, 200.0, 0.3);
        assert!((r8 / r1 - 2.0).abs() < 1e-12);
        assert!((r1 - 1.128).abs() < 1e-3, "r200m={r1}");
    }
}
