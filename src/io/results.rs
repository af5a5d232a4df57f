//! Read/write result JSON files.
//!
//! A result file records which command produced it, when, with which inputs,
//! and the computed rows. The schema is `domain::ResultFile`.

use std::fs::File;
use std::path::Path;

use chrono::Local;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::ResultFile;
use crate::error::AppError;

pub const TOOL_NAME: &str = "halo";

/// Wrap rows with run metadata.
pub fn result_file<T>(command: &str, inputs: serde_json::Value, rows: Vec<T>) -> ResultFile<T> {
    ResultFile {
        tool: TOOL_NAME.to_string(),
        command: command.to_string(),
        generated: Local::now(),
        inputs,
        rows,
    }
}

/// Write a result JSON file.
pub fn write_result_json<T: Serialize>(path: &Path, result: &ResultFile<T>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create result JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, result)
        .map_err(|e| AppError::new(2, format!("Failed to write result JSON: {e}")))?;
    Ok(())
}

/// Read a result JSON file.
pub fn read_result_json<T: DeserializeOwned>(path: &Path) -> Result<ResultFile<T>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open result JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid result JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BiasRow;

    #[test]
    fn result_file_survives_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bias.json");
        let rows = vec![BiasRow { mass: 1e14, radius: 4.4, sigma2: 0.9, nu: 1.78, bias: 1.9 }];
        let file = result_file("bias", serde_json::json!({ "omega_m": 0.3 }), rows.clone());
        write_result_json(&path, &file).unwrap();

        let back: ResultFile<BiasRow> = read_result_json(&path).unwrap();
        assert_eq!(back.tool, "halo");
        assert_eq!(back.command, "bias");
        assert_eq!(back.inputs["omega_m"], 0.3);
        assert_eq!(back.rows, rows);
    }

    #[test]
    fn malformed_json_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_result_json::<BiasRow>(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
