//! Export result rows to CSV.
//!
//! Columns are fixed per row type; floats are written in scientific notation
//! so small correlation functions and pressures keep their precision.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{BiasRow, LensingRow, PressureRow, XiRow};
use crate::error::AppError;

/// A result row with a fixed CSV layout.
pub trait CsvRow {
    const HEADER: &'static str;

    fn values(&self) -> Vec<f64>;
}

impl CsvRow for BiasRow {
    const HEADER: &'static str = "mass,radius,sigma2,nu,bias";

    fn values(&self) -> Vec<f64> {
        vec![self.mass, self.radius, self.sigma2, self.nu, self.bias]
    }
}

impl CsvRow for XiRow {
    const HEADER: &'static str = "r,xi_1h,xi_mm,xi_2h,xi_hm";

    fn values(&self) -> Vec<f64> {
        vec![self.r, self.xi_1h, self.xi_mm, self.xi_2h, self.xi_hm]
    }
}

impl CsvRow for PressureRow {
    const HEADER: &'static str = "r,pressure,projected,y";

    fn values(&self) -> Vec<f64> {
        vec![self.r, self.pressure, self.projected, self.y]
    }
}

impl CsvRow for LensingRow {
    const HEADER: &'static str = "r,sigma,sigma_mis,delta_sigma_mis";

    fn values(&self) -> Vec<f64> {
        vec![self.r, self.sigma, self.sigma_mis, self.delta_sigma_mis]
    }
}

/// Write rows to a CSV file at `path`.
pub fn write_rows_csv<T: CsvRow>(path: &Path, rows: &[T]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "{}", T::HEADER)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for row in rows {
        let line: Vec<String> = row.values().iter().map(|v| format!("{v:.10e}")).collect();
        writeln!(file, "{}", line.join(","))
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
