//! Formatted terminal output.
//!
//! Formatting lives here so the numerical code stays free of presentation and
//! output changes stay local to one module.

use crate::domain::{BiasRow, LensingRow, PressureRow, XiRow};
use crate::models::ModelParams;

/// One-line header shared by every command.
pub fn format_header(command: &str, details: &[(&str, String)]) -> String {
    let mut out = format!("=== halo {command} ===\n");
    for (name, value) in details {
        out.push_str(&format!("{name}: {value}\n"));
    }
    out
}

/// Dispatcher output: schema name plus its parameter vector.
pub fn format_model(model: &ModelParams) -> String {
    format!("model: {}\nparams: {}\n", model.display_name(), fmt_vec(&model.to_vector()))
}

pub fn format_bias_table(rows: &[BiasRow]) -> String {
    let header = ["mass", "radius", "sigma2", "nu", "bias"];
    let body = rows
        .iter()
        .map(|r| vec![fmt_sci(r.mass), fmt_fixed(r.radius), fmt_fixed(r.sigma2), fmt_fixed(r.nu), fmt_fixed(r.bias)])
        .collect();
    format_table(&header, body)
}

pub fn format_xi_table(rows: &[XiRow]) -> String {
    let header = ["r", "xi_1h", "xi_mm", "xi_2h", "xi_hm"];
    let body = rows
        .iter()
        .map(|r| vec![fmt_fixed(r.r), fmt_sci(r.xi_1h), fmt_sci(r.xi_mm), fmt_sci(r.xi_2h), fmt_sci(r.xi_hm)])
        .collect();
    format_table(&header, body)
}

pub fn format_pressure_table(rows: &[PressureRow]) -> String {
    let header = ["r", "pressure", "projected", "y"];
    let body = rows
        .iter()
        .map(|r| vec![fmt_fixed(r.r), fmt_sci(r.pressure), fmt_sci(r.projected), fmt_sci(r.y)])
        .collect();
    format_table(&header, body)
}

pub fn format_lensing_table(rows: &[LensingRow]) -> String {
    let header = ["r", "sigma", "sigma_mis", "delta_sigma_mis"];
    let body = rows
        .iter()
        .map(|r| vec![fmt_fixed(r.r), fmt_fixed(r.sigma), fmt_fixed(r.sigma_mis), fmt_fixed(r.delta_sigma_mis)])
        .collect();
    format_table(&header, body)
}

fn format_table(header: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut out = String::new();

    let head: Vec<String> = header.iter().map(|h| format!("{h:>14}")).collect();
    out.push_str(head.join(" ").trim_end());
    out.push('\n');

    let rule: Vec<String> = header.iter().map(|_| format!("{:-<14}", "")).collect();
    out.push_str(rule.join(" ").trim_end());
    out.push('\n');

    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| format!("{c:>14}")).collect();
        out.push_str(cells.join(" ").trim_end());
        out.push('\n');
    }

    out
}

fn fmt_fixed(v: f64) -> String {
    format!("{v:.4}")
}

fn fmt_sci(v: f64) -> String {
    format!("{v:.4e}")
}

pub(crate) fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}
