//! Export return reports and merged tables.
//!
//! CSV output is meant to be easy to consume in spreadsheets; a table written
//! with [`write_table_csv`] loads back through the directory loader.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{ReturnReport, Table};
use crate::error::HpiError;

/// Write ranked returns as `series,annualized_pct`.
pub fn write_returns_csv(path: &Path, report: &ReturnReport) -> Result<(), HpiError> {
    let mut writer = csv::Writer::from_writer(create(path)?);

    writer
        .write_record(["series", "annualized_pct"])
        .map_err(|e| export_err(path, "header", e))?;
    for entry in &report.returns {
        let value = entry.annualized_pct.map(|v| format!("{v:.10}")).unwrap_or_default();
        writer
            .write_record([entry.series.as_str(), value.as_str()])
            .map_err(|e| export_err(path, "row", e))?;
    }

    writer.flush().map_err(|e| export_err(path, "file", e))
}

/// Write the full report as pretty-printed JSON.
pub fn write_returns_json(path: &Path, report: &ReturnReport) -> Result<(), HpiError> {
    let mut out = BufWriter::new(create(path)?);
    serde_json::to_writer_pretty(&mut out, report).map_err(|e| HpiError::Export {
        path: path.to_path_buf(),
        message: format!("failed to serialize report: {e}"),
    })?;
    out.flush().map_err(|e| export_err(path, "file", e))
}

/// Write a table as `date,<series...>` with ISO dates and empty missing cells.
///
/// Series names are quoted as needed, so names containing the delimiter or
/// quotes survive a reload.
pub fn write_table_csv(path: &Path, table: &Table) -> Result<(), HpiError> {
    let mut writer = csv::Writer::from_writer(create(path)?);

    let header = std::iter::once("date").chain(table.columns().iter().map(String::as_str));
    writer
        .write_record(header)
        .map_err(|e| export_err(path, "header", e))?;

    for row in table.rows() {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(row.date.format("%Y-%m-%d").to_string());
        record.extend(row.values.iter().map(|v| v.map(|v| v.to_string()).unwrap_or_default()));
        writer
            .write_record(&record)
            .map_err(|e| export_err(path, "row", e))?;
    }

    writer.flush().map_err(|e| export_err(path, "file", e))
}

fn create(path: &Path) -> Result<File, HpiError> {
    File::create(path).map_err(|e| HpiError::Export {
        path: path.to_path_buf(),
        message: format!("failed to create file: {e}"),
    })
}

fn export_err(path: &Path, what: &str, e: impl std::fmt::Display) -> HpiError {
    HpiError::Export {
        path: path.to_path_buf(),
        message: format!("failed to write {what}: {e}"),
    }
}
