//! Manifest export.
//!
//! Writes the run records of a finished sweep to JSON or CSV so artifacts can
//! be located and triaged without re-running anything.

use std::path::Path;

use crate::error::{DriverError, Result};
use crate::summary::SweepSummary;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// Export the full summary, records included, as pretty-printed JSON.
pub fn export_to_json(summary: &SweepSummary, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(summary, file).map_err(|error| manifest_error(path, error))
}

/// Export one CSV row per run.
///
/// Columns: `index`, `repetition`, `parameters`, `artifact`, `status`,
/// `exit_code`, `duration_ms`, `error`. `parameters` holds `name=value`
/// pairs joined by `;`.
pub fn export_to_csv(summary: &SweepSummary, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    writer_utils::ensure_not_empty(path, &summary.records)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_to_csv_impl(summary, file).map_err(|error| manifest_error(path, error))
}

/// Picks the format from the extension: `.csv` is CSV, anything else JSON.
pub fn export_manifest(summary: &SweepSummary, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        export_to_csv(summary, path)
    } else {
        export_to_json(summary, path)
    }
}

fn manifest_error(path: &Path, error: Box<dyn std::error::Error>) -> DriverError {
    DriverError::Manifest {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
