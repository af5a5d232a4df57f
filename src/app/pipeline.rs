//! Computation pipelines behind each CLI command.
//!
//! Each pipeline turns a resolved run configuration into result rows, so the
//! CLI handlers (and `halo show`) only deal with presentation:
//! load inputs -> build grids -> evaluate profiles -> assemble rows.

use log::debug;

use crate::bias::{bias_at_nu_delta, lagrangian_mass, lagrangian_radius, sigma2_at_r_arr};
use crate::domain::{
    BiasConfig, BiasRow, DELTA_C, LensingRow, MiscenterConfig, PressureConfig, PressureRow, XiConfig, XiRow,
};
use crate::error::AppError;
use crate::io::load_power;
use crate::lensing::{SigmaProfile, delta_sigma_mis, sigma_mis_stack_arr};
use crate::math::{Quadrature, log_space};
use crate::pressure::{BbpsHalo, BbpsParams, compton_y, p_bbps_arr, projected_p_bbps_arr, r_delta_crit};
use crate::profile::{NfwHalo, r_delta};
use crate::xi::{EXACT_EPSREL, OgataQuadrature, one_halo_arr, xi_2halo, xi_hm, xi_mm_exact_arr};

/// Smallest radius of the centred Σ table used for miscentering, Mpc/h.
const SIGMA_TABLE_MIN: f64 = 1e-3;
/// Number of points in the centred Σ table.
const SIGMA_TABLE_N: usize = 500;

/// Outputs of `halo bias`.
#[derive(Debug, Clone)]
pub struct BiasRun {
    pub rows: Vec<BiasRow>,
}

/// Outputs of `halo xi`.
#[derive(Debug, Clone)]
pub struct XiRun {
    pub r_delta: f64,
    pub nu: f64,
    pub bias: f64,
    pub rows: Vec<XiRow>,
}

/// Outputs of `halo pressure`.
#[derive(Debug, Clone)]
pub struct PressureRun {
    pub r_delta: f64,
    pub params: BbpsParams,
    pub rows: Vec<PressureRow>,
}

/// Outputs of `halo miscenter`.
#[derive(Debug, Clone)]
pub struct MiscenterRun {
    pub r_delta: f64,
    pub rows: Vec<LensingRow>,
}

/// Peak height and bias for every requested mass, then every requested radius.
pub fn run_bias(config: &BiasConfig) -> Result<BiasRun, AppError> {
    let power = load_power(&config.power)?;

    let mut scales: Vec<(f64, f64)> = config
        .masses
        .iter()
        .map(|&m| (m, lagrangian_radius(m, config.omega_m)))
        .collect();
    scales.extend(config.radii.iter().map(|&r| (lagrangian_mass(r, config.omega_m), r)));
    if scales.is_empty() {
        return Err(AppError::new(2, "Provide at least one --mass or --radius."));
    }
    if !(config.omega_m.is_finite() && config.omega_m > 0.0) {
        return Err(AppError::new(2, format!("omega_m must be positive (got {})", config.omega_m)));
    }

    let radii: Vec<f64> = scales.iter().map(|s| s.1).collect();
    let sigma2 = sigma2_at_r_arr(&radii, &power)?;

    let rows = scales
        .iter()
        .zip(sigma2)
        .map(|(&(mass, radius), sigma2)| {
            let nu = DELTA_C / sigma2.sqrt();
            BiasRow {
                mass,
                radius,
                sigma2,
                nu,
                bias: bias_at_nu_delta(nu, config.delta),
            }
        })
        .collect();

    Ok(BiasRun { rows })
}

/// Halo-model correlation function on a log-spaced radial grid.
pub fn run_xi(config: &XiConfig) -> Result<XiRun, AppError> {
    let radii = log_space(config.r_min, config.r_max, config.n_r)?;
    let power = load_power(&config.power)?;
    let ogata = OgataQuadrature::new(config.ogata_n, config.ogata_h)?;

    let xi_1h = one_halo_arr(&radii, config.mass, &config.model, config.delta, config.omega_m)?;
    let xi_mm = if config.exact {
        xi_mm_exact_arr(&radii, &power, &Quadrature::new(0.0, EXACT_EPSREL, 1000))?
    } else {
        ogata.xi_mm_arr(&radii, &power)?
    };

    let radius = lagrangian_radius(config.mass, config.omega_m);
    let sigma2 = sigma2_at_r_arr(&[radius], &power)?;
    let nu = DELTA_C / sigma2[0].sqrt();
    let bias = bias_at_nu_delta(nu, config.delta);
    debug!(
        "xi: nu={nu:.4} bias={bias:.4} exact={} ogata N={} h={}",
        config.exact,
        ogata.n(),
        ogata.h()
    );

    let xi_2h = xi_2halo(bias, &xi_mm);
    let combined = xi_hm(&xi_1h, &xi_2h, config.combination)?;

    let rows = (0..radii.len())
        .map(|i| XiRow {
            r: radii[i],
            xi_1h: xi_1h[i],
            xi_mm: xi_mm[i],
            xi_2h: xi_2h[i],
            xi_hm: combined[i],
        })
        .collect();

    Ok(XiRun {
        r_delta: r_delta(config.mass, config.delta, config.omega_m),
        nu,
        bias,
        rows,
    })
}

/// BBPS pressure with the Battaglia et al. (2012) fits, 3D and projected.
pub fn run_pressure(config: &PressureConfig) -> Result<PressureRun, AppError> {
    let radii = log_space(config.r_min, config.r_max, config.n_r)?;
    let halo = BbpsHalo {
        mass: config.mass,
        z: config.z,
        omega_b: config.omega_b,
        omega_m: config.omega_m,
        h: config.h,
        delta: config.delta,
    };
    let params = BbpsParams::battaglia(config.mass, config.z);
    debug!(
        "BBPS fit: P0={:.4} x_c={:.4} beta={:.4}",
        params.p0, params.x_c, params.beta
    );

    let quadrature = Quadrature::new(0.0, 1e-5, 1000);
    let pressure = p_bbps_arr(&radii, &halo, &params)?;
    let projected = projected_p_bbps_arr(&radii, &halo, &params, &quadrature)?;

    let rows = (0..radii.len())
        .map(|i| PressureRow {
            r: radii[i],
            pressure: pressure[i],
            projected: projected[i],
            y: compton_y(projected[i]),
        })
        .collect();

    Ok(PressureRun {
        r_delta: r_delta_crit(config.mass, config.z, config.omega_m, config.h, config.delta),
        params,
        rows,
    })
}

/// Miscentered NFW Σ and ΔΣ on a log-spaced projected grid.
///
/// The centred profile is tabulated well past the requested range; ΔΣ is
/// then computed from the miscentered Σ on the output grid itself.
pub fn run_miscenter(config: &MiscenterConfig) -> Result<MiscenterRun, AppError> {
    let radii = log_space(config.r_min, config.r_max, config.n_r)?;
    if !(config.mass > 0.0 && config.concentration > 0.0 && config.omega_m > 0.0 && config.delta > 0.0) {
        return Err(AppError::new(
            2,
            "mass, concentration, omega_m and delta must all be positive.",
        ));
    }
    let halo = NfwHalo {
        mass: config.mass,
        concentration: config.concentration,
        delta: config.delta,
        omega_m: config.omega_m,
    };

    let table_r = log_space(
        SIGMA_TABLE_MIN.min(config.r_min),
        (10.0 * config.r_max).max(100.0),
        SIGMA_TABLE_N,
    )?;
    let table_sigma: Vec<f64> = table_r.iter().map(|&r| halo.sigma(r)).collect();
    let profile = SigmaProfile::new(&table_r, &table_sigma, halo)?;

    let sigma_mis = sigma_mis_stack_arr(&radii, &profile, config.r_mis, config.distribution)?;
    debug!(
        "miscentering: {} radii, r_mis={}, distribution={:?}",
        radii.len(),
        config.r_mis,
        config.distribution
    );
    let delta_sigma = delta_sigma_mis(&radii, &radii, &sigma_mis)?;

    let rows = (0..radii.len())
        .map(|i| LensingRow {
            r: radii[i],
            sigma: profile.eval(radii[i]),
            sigma_mis: sigma_mis[i],
            delta_sigma_mis: delta_sigma[i],
        })
        .collect();

    Ok(MiscenterRun {
        r_delta: r_delta(config.mass, config.delta, config.omega_m),
        rows,
    })
}
