//! Physical constants shared by the profile, bias and pressure code.

/// Mean matter density per unit Ω_m: `1e4 * 3 / (8 π G)` in Msun h² / Mpc³.
pub const RHOM_CONST: f64 = 2.775_337_426_39e11;

/// Critical density of the universe, `3 (100 km/s/Mpc)² / (8 π G)`, in Msun h² / Mpc³.
pub const RHO_CRIT: f64 = 2.775_366_27e11;

/// Spherical collapse threshold.
pub const DELTA_C: f64 = 1.686;

/// Newton's constant in Mpc³ Msun⁻¹ s⁻².
pub const G_MPC_MSUN_S: f64 = 4.517_103_05e-48;

/// `σ_T / (m_e c²)` in Msun⁻¹ s², converts integrated pressure to Compton y.
pub const P_TO_Y: f64 = 1.615_742_02e15;

/// Default halo overdensity (with respect to the mean matter density).
pub const DEFAULT_DELTA: f64 = 200.0;

/// Mean matter density for the given Ω_m, in Msun h² / Mpc³.
pub fn rho_m(omega_m: f64) -> f64 {
    omega_m * RHOM_CONST
}
