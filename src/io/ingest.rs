//! Whitespace-separated column ingest.
//!
//! Power spectra and profile tables arrive as plain text: one row per line,
//! columns separated by spaces or tabs, `#` starting a comment. Blank lines
//! are skipped. Every non-comment row must have the same number of columns.

use std::fs;
use std::path::Path;

use log::debug;

use crate::domain::PowerSource;
use crate::error::AppError;
use crate::power::{LinearPower, bbks};

/// Columns of a numeric text table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnTable {
    pub columns: Vec<Vec<f64>>,
}

impl ColumnTable {
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Take exactly `n` columns, or fail naming `what` was being read.
    fn expect_columns(self, n: usize, what: &str, path: &Path) -> Result<Vec<Vec<f64>>, AppError> {
        if self.n_columns() != n {
            return Err(AppError::new(
                2,
                format!(
                    "{what} file '{}' must have {n} column(s), found {}",
                    path.display(),
                    self.n_columns()
                ),
            ));
        }
        Ok(self.columns)
    }
}

/// Parse a whitespace-separated numeric table from text.
pub fn parse_columns(text: &str) -> Result<ColumnTable, String> {
    let mut columns: Vec<Vec<f64>> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let values = content
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>()
                    .map_err(|_| format!("line {line}: '{tok}' is not a number"))
            })
            .collect::<Result<Vec<f64>, String>>()?;

        if columns.is_empty() {
            columns = vec![Vec::new(); values.len()];
        } else if values.len() != columns.len() {
            return Err(format!(
                "line {line}: expected {} column(s), found {}",
                columns.len(),
                values.len()
            ));
        }
        for (col, v) in columns.iter_mut().zip(values) {
            col.push(v);
        }
    }

    if columns.is_empty() {
        return Err("no data rows".to_string());
    }
    Ok(ColumnTable { columns })
}

/// Read a whitespace-separated numeric table from disk.
pub fn read_columns(path: &Path) -> Result<ColumnTable, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to read '{}': {e}", path.display())))?;
    let table = parse_columns(&text).map_err(|e| AppError::new(2, format!("Invalid table '{}': {e}", path.display())))?;
    debug!(
        "read {} row(s) x {} column(s) from {}",
        table.n_rows(),
        table.n_columns(),
        path.display()
    );
    Ok(table)
}

/// Read a two-column `(x, y)` table.
pub fn read_xy(path: &Path, what: &str) -> Result<(Vec<f64>, Vec<f64>), AppError> {
    let mut cols = read_columns(path)?.expect_columns(2, what, path)?;
    let y = cols.pop().unwrap_or_default();
    let x = cols.pop().unwrap_or_default();
    Ok((x, y))
}

fn read_single(path: &Path, what: &str) -> Result<Vec<f64>, AppError> {
    let mut cols = read_columns(path)?.expect_columns(1, what, path)?;
    Ok(cols.pop().unwrap_or_default())
}

/// Resolve a power-spectrum source into a validated spectrum.
pub fn load_power(source: &PowerSource) -> Result<LinearPower, AppError> {
    let power = match source {
        PowerSource::Table(path) => {
            let (k, p) = read_xy(path, "power spectrum")?;
            LinearPower::new(k, p)?
        }
        PowerSource::Columns { k, p } => {
            let k_vals = read_single(k, "wavenumber")?;
            let p_vals = read_single(p, "power")?;
            LinearPower::new(k_vals, p_vals)?
        }
        PowerSource::Bbks(config) => bbks(config)?,
    };
    debug!(
        "power spectrum: {} point(s), k=[{:e}, {:e}]",
        power.len(),
        power.k_min(),
        power.k_max()
    );
    Ok(power)
}
