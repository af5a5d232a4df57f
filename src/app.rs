//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves them into run configurations
//! - runs the numerical pipelines
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use log::info;
use serde_json::json;

use crate::cli::{
    BiasArgs, Command, MiscenterArgs, ModelArgs, OutputArgs, PowerArgs, PressureArgs, ShowArgs, XiArgs,
};
use crate::domain::{
    BbksConfig, BiasConfig, BiasRow, LensingRow, MiscenterConfig, OutputOptions, PowerSource, PressureConfig,
    PressureRow, XiConfig, XiRow,
};
use crate::error::AppError;
use crate::io::{CsvRow, read_result_json, result_file, write_result_json, write_rows_csv};
use crate::models::{ModelParams, collect_params, dispatch};

pub mod pipeline;

/// Entry point for the `halo` binary.
pub fn run() -> Result<(), AppError> {
    // `HALO_POWER_FILE` may come from a local `.env`.
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Model(args) => handle_model(args),
        Command::Bias(args) => handle_bias(args),
        Command::Xi(args) => handle_xi(args),
        Command::Pressure(args) => handle_pressure(args),
        Command::Miscenter(args) => handle_miscenter(args),
        Command::Show(args) => handle_show(args),
    }
}

fn handle_model(args: ModelArgs) -> Result<(), AppError> {
    let (model, vector) = resolve_model(&args)?;
    info!("resolved 1-halo model {model} with parameter vector {vector:?}");
    print!("{}", crate::report::format_model(&model));
    Ok(())
}

/// The selected 1-halo model and its parameter vector. No `-p` flags means
/// no parameters at all.
pub fn resolve_model(args: &ModelArgs) -> Result<(ModelParams, Vec<f64>), AppError> {
    let params = collect_params(&args.params);
    let vector = dispatch((!params.is_empty()).then_some(&params))?;
    let model = ModelParams::from_params(&params)?;
    Ok((model, vector))
}

fn handle_bias(args: BiasArgs) -> Result<(), AppError> {
    let config = bias_config_from_args(&args);
    let run = pipeline::run_bias(&config)?;
    info!("bias: {} scale(s)", run.rows.len());

    print!(
        "{}",
        crate::report::format_header(
            "bias",
            &[
                ("power", describe_power(&config.power)),
                ("omega_m", config.omega_m.to_string()),
                ("delta", config.delta.to_string()),
            ],
        )
    );
    println!("{}", crate::report::format_bias_table(&run.rows));

    if config.output.plot {
        println!(
            "{}",
            crate::plot::plot_bias(&run.rows, config.output.plot_width, config.output.plot_height)
        );
    }

    let inputs = json!({
        "power": describe_power(&config.power),
        "omega_m": config.omega_m,
        "delta": config.delta,
    });
    write_outputs("bias", &config.output, inputs, run.rows)
}

fn handle_xi(args: XiArgs) -> Result<(), AppError> {
    let config = xi_config_from_args(&args)?;
    let run = pipeline::run_xi(&config)?;
    info!("xi: {} radii, model {}", run.rows.len(), config.model);

    print!(
        "{}",
        crate::report::format_header(
            "xi",
            &[
                ("power", describe_power(&config.power)),
                ("mass", format!("{:e}", config.mass)),
                ("profile", config.model.to_string()),
                ("R_delta", format!("{:.4}", run.r_delta)),
                ("nu", format!("{:.4}", run.nu)),
                ("bias", format!("{:.4}", run.bias)),
                ("combine", format!("{:?}", config.combination).to_lowercase()),
            ],
        )
    );
    println!("{}", crate::report::format_xi_table(&run.rows));

    if config.output.plot {
        println!(
            "{}",
            crate::plot::plot_xi(&run.rows, config.output.plot_width, config.output.plot_height)
        );
    }

    let inputs = json!({
        "power": describe_power(&config.power),
        "mass": config.mass,
        "model": config.model,
        "omega_m": config.omega_m,
        "delta": config.delta,
        "combine": config.combination,
        "ogata_n": config.ogata_n,
        "ogata_h": config.ogata_h,
        "exact": config.exact,
        "bias": run.bias,
    });
    write_outputs("xi", &config.output, inputs, run.rows)
}

fn handle_pressure(args: PressureArgs) -> Result<(), AppError> {
    let config = pressure_config_from_args(&args);
    let run = pipeline::run_pressure(&config)?;
    info!("pressure: {} radii", run.rows.len());

    print!(
        "{}",
        crate::report::format_header(
            "pressure",
            &[
                ("mass", format!("{:e}", config.mass)),
                ("z", config.z.to_string()),
                ("R_delta", format!("{:.4}", run.r_delta)),
                (
                    "fit",
                    format!(
                        "P0={:.4} x_c={:.4} beta={:.4}",
                        run.params.p0, run.params.x_c, run.params.beta
                    ),
                ),
            ],
        )
    );
    println!("{}", crate::report::format_pressure_table(&run.rows));

    if config.output.plot {
        println!(
            "{}",
            crate::plot::plot_pressure(&run.rows, config.output.plot_width, config.output.plot_height)
        );
    }

    let inputs = json!({
        "mass": config.mass,
        "z": config.z,
        "omega_b": config.omega_b,
        "omega_m": config.omega_m,
        "h": config.h,
        "delta": config.delta,
    });
    write_outputs("pressure", &config.output, inputs, run.rows)
}

fn handle_miscenter(args: MiscenterArgs) -> Result<(), AppError> {
    let config = miscenter_config_from_args(&args);
    let run = pipeline::run_miscenter(&config)?;
    info!("miscenter: {} radii, {:?} offsets", run.rows.len(), config.distribution);

    print!(
        "{}",
        crate::report::format_header(
            "miscenter",
            &[
                ("mass", format!("{:e}", config.mass)),
                ("concentration", config.concentration.to_string()),
                ("R_delta", format!("{:.4}", run.r_delta)),
                ("r_mis", config.r_mis.to_string()),
                ("distribution", format!("{:?}", config.distribution).to_lowercase()),
            ],
        )
    );
    println!("{}", crate::report::format_lensing_table(&run.rows));

    if config.output.plot {
        println!(
            "{}",
            crate::plot::plot_lensing(&run.rows, config.output.plot_width, config.output.plot_height)
        );
    }

    let inputs = json!({
        "mass": config.mass,
        "concentration": config.concentration,
        "delta": config.delta,
        "omega_m": config.omega_m,
        "r_mis": config.r_mis,
        "distribution": config.distribution,
    });
    write_outputs("miscenter", &config.output, inputs, run.rows)
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let result = read_result_json::<serde_json::Value>(&args.result)?;
    info!("showing '{}' result generated {}", result.command, result.generated);

    print!(
        "{}",
        crate::report::format_header(
            &result.command,
            &[
                ("generated", result.generated.to_rfc3339()),
                ("inputs", result.inputs.to_string()),
            ],
        )
    );

    let rows = serde_json::Value::Array(result.rows);
    let (table, plot) = match result.command.as_str() {
        "bias" => {
            let rows: Vec<BiasRow> = decode_rows(rows)?;
            (crate::report::format_bias_table(&rows), crate::plot::plot_bias(&rows, args.width, args.height))
        }
        "xi" => {
            let rows: Vec<XiRow> = decode_rows(rows)?;
            (crate::report::format_xi_table(&rows), crate::plot::plot_xi(&rows, args.width, args.height))
        }
        "pressure" => {
            let rows: Vec<PressureRow> = decode_rows(rows)?;
            (
                crate::report::format_pressure_table(&rows),
                crate::plot::plot_pressure(&rows, args.width, args.height),
            )
        }
        "miscenter" => {
            let rows: Vec<LensingRow> = decode_rows(rows)?;
            (
                crate::report::format_lensing_table(&rows),
                crate::plot::plot_lensing(&rows, args.width, args.height),
            )
        }
        other => {
            return Err(AppError::new(2, format!("Result file has unknown command '{other}'.")));
        }
    };

    println!("{table}");
    if args.plot {
        println!("{plot}");
    }
    Ok(())
}

fn decode_rows<T: serde::de::DeserializeOwned>(rows: serde_json::Value) -> Result<Vec<T>, AppError> {
    serde_json::from_value(rows).map_err(|e| AppError::new(2, format!("Invalid result rows: {e}")))
}

/// Write the optional CSV and JSON exports for a run.
fn write_outputs<T: CsvRow + serde::Serialize>(
    command: &str,
    output: &OutputOptions,
    inputs: serde_json::Value,
    rows: Vec<T>,
) -> Result<(), AppError> {
    if let Some(path) = &output.export_csv {
        write_rows_csv(path, &rows)?;
        info!("wrote {} row(s) to {}", rows.len(), path.display());
    }
    if let Some(path) = &output.export_json {
        write_result_json(path, &result_file(command, inputs, rows))?;
        info!("wrote result JSON to {}", path.display());
    }
    Ok(())
}

/// Resolve the power-spectrum flags: split `--k`/`--p` files, then a
/// two-column `--power` file (or `HALO_POWER_FILE`), then the BBKS fallback.
pub fn power_source_from_args(args: &PowerArgs, omega_m: f64) -> PowerSource {
    if let (Some(k), Some(p)) = (&args.k_file, &args.p_file) {
        return PowerSource::Columns {
            k: k.clone(),
            p: p.clone(),
        };
    }
    if let Some(path) = &args.power {
        return PowerSource::Table(path.clone());
    }
    PowerSource::Bbks(BbksConfig {
        omega_m,
        h: args.h,
        n_s: args.n_s,
        sigma8: args.sigma8,
        ..BbksConfig::default()
    })
}

fn describe_power(source: &PowerSource) -> String {
    match source {
        PowerSource::Table(path) => path.display().to_string(),
        PowerSource::Columns { k, p } => format!("{} + {}", k.display(), p.display()),
        PowerSource::Bbks(c) => format!("BBKS (sigma8={}, n_s={}, h={})", c.sigma8, c.n_s, c.h),
    }
}

pub fn output_options_from_args(args: &OutputArgs) -> OutputOptions {
    OutputOptions {
        plot: args.plot,
        plot_width: args.width,
        plot_height: args.height,
        export_csv: args.export.clone(),
        export_json: args.json.clone(),
    }
}

pub fn bias_config_from_args(args: &BiasArgs) -> BiasConfig {
    BiasConfig {
        power: power_source_from_args(&args.power, args.omega_m),
        omega_m: args.omega_m,
        delta: args.delta,
        masses: args.masses.clone(),
        radii: args.radii.clone(),
        output: output_options_from_args(&args.output),
    }
}

pub fn xi_config_from_args(args: &XiArgs) -> Result<XiConfig, AppError> {
    let model = ModelParams::from_params(&collect_params(&args.params))?;
    Ok(XiConfig {
        power: power_source_from_args(&args.power, args.omega_m),
        omega_m: args.omega_m,
        delta: args.delta,
        mass: args.mass,
        model,
        r_min: args.rmin,
        r_max: args.rmax,
        n_r: args.n,
        combination: args.combine,
        ogata_n: args.ogata_n,
        ogata_h: args.ogata_h,
        exact: args.exact,
        output: output_options_from_args(&args.output),
    })
}

pub fn pressure_config_from_args(args: &PressureArgs) -> PressureConfig {
    PressureConfig {
        mass: args.mass,
        z: args.z,
        omega_b: args.omega_b,
        omega_m: args.omega_m,
        h: args.h,
        delta: args.delta,
        r_min: args.rmin,
        r_max: args.rmax,
        n_r: args.n,
        output: output_options_from_args(&args.output),
    }
}

pub fn miscenter_config_from_args(args: &MiscenterArgs) -> MiscenterConfig {
    MiscenterConfig {
        mass: args.mass,
        concentration: args.concentration,
        delta: args.delta,
        omega_m: args.omega_m,
        r_mis: args.rmis,
        distribution: args.distribution,
        r_min: args.rmin,
        r_max: args.rmax,
        n_r: args.n,
        output: output_options_from_args(&args.output),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::cli::Cli;

    fn parse(argv: &[&str]) -> Command {
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn split_power_files_win_over_table() {
        let Command::Bias(args) = parse(&[
            "halo", "bias", "--mass", "1e14", "--power", "pk.txt", "--k", "k.txt", "--p", "p.txt",
        ]) else {
            panic!("expected bias command");
        };
        let source = power_source_from_args(&args.power, 0.3);
        assert_eq!(
            source,
            PowerSource::Columns {
                k: PathBuf::from("k.txt"),
                p: PathBuf::from("p.txt"),
            }
        );
    }

    #[test]
    fn synthetic_power_follows_cosmology_flags() {
        // Built directly so HALO_POWER_FILE in the environment cannot interfere.
        let args = PowerArgs {
            power: None,
            k_file: None,
            p_file: None,
            sigma8: 0.9,
            n_s: 0.96,
            h: 0.7,
        };
        let PowerSource::Bbks(config) = power_source_from_args(&args, 0.25) else {
            panic!("expected synthetic spectrum");
        };
        assert_eq!(config.omega_m, 0.25);
        assert_eq!(config.sigma8, 0.9);
        assert_eq!(config.n_s, 0.96);
        assert_eq!(config.h, 0.7);
        assert_eq!(config.n_k, BbksConfig::default().n_k);
    }

    #[test]
    fn model_command_goes_through_dispatch() {
        let Command::Model(args) = parse(&["halo", "model"]) else {
            panic!("expected model command");
        };
        assert_eq!(resolve_model(&args).unwrap(), (ModelParams::None, Vec::new()));

        let Command::Model(args) = parse(&["halo", "model", "-p", "rs=0.2", "-p", "alpha=0.18"]) else {
            panic!("expected model command");
        };
        let (model, vector) = resolve_model(&args).unwrap();
        assert_eq!(model, ModelParams::Einasto { rs: 0.2, alpha: 0.18 });
        assert_eq!(vector, vec![0.2, 0.18]);

        let Command::Model(args) = parse(&["halo", "model", "-p", "eggs=1"]) else {
            panic!("expected model command");
        };
        assert_eq!(resolve_model(&args).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn xi_config_resolves_profile() {
        let Command::Xi(args) = parse(&["halo", "xi", "--mass", "1e14", "-p", "rs=0.2", "-p", "alpha=0.18"]) else {
            panic!("expected xi command");
        };
        let config = xi_config_from_args(&args).unwrap();
        assert_eq!(config.model, ModelParams::Einasto { rs: 0.2, alpha: 0.18 });

        let Command::Xi(args) = parse(&["halo", "xi", "--mass", "1e14", "-p", "eggs=1"]) else {
            panic!("expected xi command");
        };
        assert_eq!(xi_config_from_args(&args).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn output_flags_carry_into_config() {
        let Command::Miscenter(args) = parse(&[
            "halo", "miscenter", "--mass", "1e14", "-c", "5", "--rmis", "0.2", "--plot", "--json", "out.json",
        ]) else {
            panic!("expected miscenter command");
        };
        let config = miscenter_config_from_args(&args);
        assert!(config.output.plot);
        assert_eq!(config.output.plot_width, 100);
        assert_eq!(config.output.export_json, Some(PathBuf::from("out.json")));
        assert_eq!(config.output.export_csv, None);
    }

    #[test]
    fn outputs_round_trip_through_show_decoding() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("bias.json");
        let csv_path = dir.path().join("bias.csv");
        let output = OutputOptions {
            export_csv: Some(csv_path.clone()),
            export_json: Some(json_path.clone()),
            ..OutputOptions::default()
        };
        let rows = vec![BiasRow { mass: 1e14, radius: 2.0, sigma2: 1.5, nu: 1.3, bias: 1.4 }];
        write_outputs("bias", &output, json!({"omega_m": 0.3}), rows.clone()).unwrap();

        assert!(std::fs::read_to_string(&csv_path).unwrap().starts_with(BiasRow::HEADER));
        let file = read_result_json::<serde_json::Value>(&json_path).unwrap();
        assert_eq!(file.command, "bias");
        let decoded: Vec<BiasRow> = decode_rows(serde_json::Value::Array(file.rows)).unwrap();
        assert_eq!(decoded, rows);
    }
}
