//! Command-line parsing for the `halo` toolkit.
//!
//! Argument parsing and command dispatch stay separate from the numerical
//! code; `app` turns these structs into run configurations.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Combination, DEFAULT_DELTA, MisDistribution};
use crate::models::NamedParam;
use crate::xi::{DEFAULT_OGATA_H, DEFAULT_OGATA_N};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "halo", version, about = "Halo-model correlation functions, bias, lensing and pressure profiles")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve named 1-halo parameters into a model and its parameter vector.
    Model(ModelArgs),
    /// Peak height and Tinker bias at a set of masses or Lagrangian radii.
    Bias(BiasArgs),
    /// 1-halo, matter, 2-halo and combined correlation functions.
    Xi(XiArgs),
    /// BBPS pressure profile and its projection.
    Pressure(PressureArgs),
    /// Miscentered NFW surface density and excess surface density.
    Miscenter(MiscenterArgs),
    /// Print (and optionally plot) a result JSON written with `--json`.
    Show(ShowArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Profile parameter as name=value (repeatable), e.g. `-p c=5` or `-p rs=0.2 -p alpha=0.18`.
    #[arg(short = 'p', long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<NamedParam>,
}

/// Where the linear power spectrum comes from.
///
/// With no file, a BBKS spectrum is generated from `--sigma8`, `--n-s` and `--h`.
#[derive(Debug, Args, Clone)]
pub struct PowerArgs {
    /// Two-column `k P(k)` file (k in h/Mpc, P in (Mpc/h)^3). `--k`/`--p` take precedence.
    #[arg(long, env = "HALO_POWER_FILE", value_name = "FILE")]
    pub power: Option<PathBuf>,

    /// Single-column wavenumber file; use together with `--p`.
    #[arg(long = "k", value_name = "FILE", requires = "p_file")]
    pub k_file: Option<PathBuf>,

    /// Single-column power file; use together with `--k`.
    #[arg(long = "p", value_name = "FILE", requires = "k_file")]
    pub p_file: Option<PathBuf>,

    /// σ8 of the synthetic spectrum.
    #[arg(long, default_value_t = 0.8)]
    pub sigma8: f64,

    /// Spectral index of the synthetic spectrum.
    #[arg(long = "n-s", default_value_t = 0.96)]
    pub n_s: f64,

    /// Hubble parameter h of the synthetic spectrum.
    #[arg(long, default_value_t = 0.7)]
    pub h: f64,
}

/// Output options shared by every computing command.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Render an ASCII plot in the terminal.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export result rows to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Save result rows and inputs to JSON.
    #[arg(long, value_name = "JSON")]
    pub json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct BiasArgs {
    /// Halo mass in Msun/h (repeatable).
    #[arg(long = "mass", value_name = "M", required_unless_present = "radii")]
    pub masses: Vec<f64>,

    /// Lagrangian radius in Mpc/h (repeatable).
    #[arg(long = "radius", value_name = "R")]
    pub radii: Vec<f64>,

    /// Matter density parameter.
    #[arg(long = "omega-m", default_value_t = 0.3)]
    pub omega_m: f64,

    /// Halo overdensity relative to the mean matter density.
    #[arg(long, default_value_t = DEFAULT_DELTA)]
    pub delta: f64,

    #[command(flatten)]
    pub power: PowerArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct XiArgs {
    /// Halo mass in Msun/h.
    #[arg(long)]
    pub mass: f64,

    /// 1-halo profile parameter as name=value (repeatable).
    #[arg(short = 'p', long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<NamedParam>,

    #[arg(long = "omega-m", default_value_t = 0.3)]
    pub omega_m: f64,

    #[arg(long, default_value_t = DEFAULT_DELTA)]
    pub delta: f64,

    /// Smallest 3D radius, Mpc/h comoving.
    #[arg(long, default_value_t = 0.1)]
    pub rmin: f64,

    /// Largest 3D radius, Mpc/h comoving.
    #[arg(long, default_value_t = 50.0)]
    pub rmax: f64,

    /// Number of log-spaced radii.
    #[arg(long, default_value_t = 40)]
    pub n: usize,

    /// How to combine the 1-halo and 2-halo terms.
    #[arg(long, value_enum, default_value_t = Combination::Max)]
    pub combine: Combination,

    /// Number of Ogata quadrature nodes.
    #[arg(long = "ogata-n", default_value_t = DEFAULT_OGATA_N)]
    pub ogata_n: usize,

    /// Ogata quadrature step size.
    #[arg(long = "ogata-h", default_value_t = DEFAULT_OGATA_H)]
    pub ogata_h: f64,

    /// Compute the matter correlation function by direct quadrature (slow).
    #[arg(long)]
    pub exact: bool,

    #[command(flatten)]
    pub power: PowerArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct PressureArgs {
    /// Halo mass in Msun.
    #[arg(long)]
    pub mass: f64,

    /// Redshift.
    #[arg(long)]
    pub z: f64,

    #[arg(long = "omega-b", default_value_t = 0.04)]
    pub omega_b: f64,

    #[arg(long = "omega-m", default_value_t = 0.28)]
    pub omega_m: f64,

    #[arg(long, default_value_t = 0.7)]
    pub h: f64,

    /// Halo overdensity relative to the critical density.
    #[arg(long, default_value_t = DEFAULT_DELTA)]
    pub delta: f64,

    /// Smallest radius, Mpc.
    #[arg(long, default_value_t = 0.01)]
    pub rmin: f64,

    /// Largest radius, Mpc.
    #[arg(long, default_value_t = 5.0)]
    pub rmax: f64,

    #[arg(long, default_value_t = 30)]
    pub n: usize,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct MiscenterArgs {
    /// Halo mass in Msun/h.
    #[arg(long)]
    pub mass: f64,

    /// NFW concentration.
    #[arg(short = 'c', long = "concentration")]
    pub concentration: f64,

    /// Miscentering length, Mpc/h comoving.
    #[arg(long)]
    pub rmis: f64,

    /// Offset distribution.
    #[arg(long, value_enum, default_value_t = MisDistribution::Single)]
    pub distribution: MisDistribution,

    #[arg(long, default_value_t = DEFAULT_DELTA)]
    pub delta: f64,

    #[arg(long = "omega-m", default_value_t = 0.3)]
    pub omega_m: f64,

    /// Smallest projected radius, Mpc/h comoving.
    #[arg(long, default_value_t = 0.05)]
    pub rmin: f64,

    /// Largest projected radius, Mpc/h comoving.
    #[arg(long, default_value_t = 30.0)]
    pub rmax: f64,

    #[arg(long, default_value_t = 30)]
    pub n: usize,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Result JSON produced by another command's `--json`.
    #[arg(long, value_name = "JSON")]
    pub result: PathBuf,

    /// Also render an ASCII plot.
    #[arg(long)]
    pub plot: bool,

    #[arg(long, default_value_t = 100)]
    pub width: usize,

    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
