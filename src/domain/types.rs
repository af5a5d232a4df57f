//! Shared domain types.
//!
//! Run configurations are derived from CLI flags; result rows are kept
//! serializable so they can be printed, exported to CSV/JSON, or plotted.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::models::ModelParams;

/// How the 1-halo and 2-halo correlation functions are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Combination {
    /// Element-wise maximum of the two terms.
    Max,
    /// `1 + ξ_1h + ξ_2h`.
    Sum,
}

/// Offset model for miscentered lensing profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MisDistribution {
    /// A single cluster displaced by exactly `R_mis`.
    Single,
    /// Stack with Rayleigh-distributed offsets of scale `R_mis`.
    Rayleigh,
    /// Stack with offsets `∝ R e^{-R/R_mis}`.
    Exponential,
}

/// Where the linear power spectrum comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum PowerSource {
    /// A two-column `k P(k)` text file.
    Table(PathBuf),
    /// Separate single-column wavenumber and power files.
    Columns { k: PathBuf, p: PathBuf },
    /// Synthetic BBKS spectrum.
    Bbks(BbksConfig),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BbksConfig {
    pub omega_m: f64,
    pub h: f64,
    pub n_s: f64,
    pub sigma8: f64,
    pub k_min: f64,
    pub k_max: f64,
    pub n_k: usize,
}

impl Default for BbksConfig {
    fn default() -> Self {
        Self {
            omega_m: 0.3,
            h: 0.7,
            n_s: 0.96,
            sigma8: 0.8,
            k_min: 1e-4,
            k_max: 1e2,
            n_k: 400,
        }
    }
}

/// Presentation and export options common to every command.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

/// Configuration for a bias run.
#[derive(Debug, Clone)]
pub struct BiasConfig {
    pub power: PowerSource,
    pub omega_m: f64,
    pub delta: f64,
    pub masses: Vec<f64>,
    pub radii: Vec<f64>,
    pub output: OutputOptions,
}

/// Configuration for a halo-model correlation function run.
#[derive(Debug, Clone)]
pub struct XiConfig {
    pub power: PowerSource,
    pub omega_m: f64,
    pub delta: f64,
    pub mass: f64,
    pub model: ModelParams,
    pub r_min: f64,
    pub r_max: f64,
    pub n_r: usize,
    pub combination: Combination,
    pub ogata_n: usize,
    pub ogata_h: f64,
    /// Integrate `ξ_mm` directly in `k` instead of with the Ogata rule.
    pub exact: bool,
    pub output: OutputOptions,
}

/// Configuration for a BBPS pressure profile run.
#[derive(Debug, Clone)]
pub struct PressureConfig {
    pub mass: f64,
    pub z: f64,
    pub omega_b: f64,
    pub omega_m: f64,
    pub h: f64,
    pub delta: f64,
    pub r_min: f64,
    pub r_max: f64,
    pub n_r: usize,
    pub output: OutputOptions,
}

/// Configuration for a miscentered lensing run.
#[derive(Debug, Clone)]
pub struct MiscenterConfig {
    pub mass: f64,
    pub concentration: f64,
    pub delta: f64,
    pub omega_m: f64,
    pub r_mis: f64,
    pub distribution: MisDistribution,
    pub r_min: f64,
    pub r_max: f64,
    pub n_r: usize,
    pub output: OutputOptions,
}

/// Bias and peak height at one scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiasRow {
    /// Msun/h
    pub mass: f64,
    /// Lagrangian radius, Mpc/h comoving.
    pub radius: f64,
    pub sigma2: f64,
    pub nu: f64,
    pub bias: f64,
}

/// Correlation functions at one radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XiRow {
    pub r: f64,
    pub xi_1h: f64,
    pub xi_mm: f64,
    pub xi_2h: f64,
    pub xi_hm: f64,
}

/// Pressure profile at one radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureRow {
    pub r: f64,
    pub pressure: f64,
    pub projected: f64,
    /// Compton y of the projected pressure.
    pub y: f64,
}

/// Lensing profiles at one projected radius (h Msun / pc²).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LensingRow {
    pub r: f64,
    pub sigma: f64,
    pub sigma_mis: f64,
    pub delta_sigma_mis: f64,
}

/// A saved result file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultFile<T> {
    pub tool: String,
    pub command: String,
    pub generated: DateTime<Local>,
    /// Free-form description of the inputs that produced `rows`.
    pub inputs: serde_json::Value,
    pub rows: Vec<T>,
}
