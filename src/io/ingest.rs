//! Directory ingest: per-state HPI CSV files merged into one table.
//!
//! Every file whose name carries the configured extension is read as a table
//! whose first column is the observation date and whose remaining columns are
//! named series. Files are outer-joined on the date, so a state that starts
//! reporting later simply has gaps before its first observation.
//!
//! Only dates are validated. A value cell that is not a finite number is
//! treated as missing.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::domain::{Row, Table};
use crate::error::HpiError;

/// Column-name fragment FRED appends to state HPI series (`CASTHPI`).
pub const DEFAULT_COLUMN_TOKEN: &str = "STHPI";

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// File extension (without the dot) of files to read. Matched case-sensitively.
    pub extension: String,
    /// Literal fragment removed from every column name before trimming.
    pub column_token: String,
    /// Field delimiter.
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            extension: "csv".to_string(),
            column_token: DEFAULT_COLUMN_TOKEN.to_string(),
            delimiter: b',',
        }
    }
}

/// Load and merge every state HPI CSV in `directory` with default options.
pub fn load_state_data(directory: impl AsRef<Path>) -> Result<Table, HpiError> {
    load_with_options(directory, &LoadOptions::default())
}

/// Load and merge every matching file in `directory`.
///
/// Files are visited in file-name order, which fixes the column order of the
/// result. Any failure aborts the whole load.
pub fn load_with_options(directory: impl AsRef<Path>, options: &LoadOptions) -> Result<Table, HpiError> {
    let directory = directory.as_ref();
    let files = list_table_files(directory, options)?;

    let mut merged = Table::default();
    for path in &files {
        let table = read_table_file(path, options)?;
        for column in table.columns() {
            if merged.column_index(column).is_some() {
                warn!(
                    column = column.as_str(),
                    file = %path.display(),
                    "series appears in more than one file; later values take precedence"
                );
            }
        }
        merged = merged.outer_join(&table);
    }

    info!(
        directory = %directory.display(),
        files = files.len(),
        series = merged.columns().len(),
        rows = merged.len(),
        "loaded HPI data"
    );
    Ok(merged)
}

/// Read a single delimited file into a table.
pub fn read_table_file(path: &Path, options: &LoadOptions) -> Result<Table, HpiError> {
    let file = File::open(path).map_err(|e| HpiError::Io {
        path: path.to_path_buf(),
        message: format!("failed to open file: {e}"),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(options.delimiter)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| HpiError::Csv {
            path: path.to_path_buf(),
            message: format!("failed to read headers: {e}"),
        })?
        .clone();

    let columns: Vec<String> = headers
        .iter()
        .skip(1)
        .map(|name| normalize_column_name(name, &options.column_token))
        .collect();
    for (idx, column) in columns.iter().enumerate() {
        if columns[..idx].contains(column) {
            warn!(
                column = column.as_str(),
                file = %path.display(),
                "headers normalize to the same series; later columns take precedence"
            );
        }
    }

    let mut rows = Vec::new();
    let mut dropped_cells = 0usize;

    for result in reader.records() {
        let record = result.map_err(|e| HpiError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let label = record.get(0).unwrap_or_default();
        let date = parse_date_label(label).ok_or_else(|| HpiError::DateLabel {
            path: path.to_path_buf(),
            label: label.to_string(),
        })?;

        rows.push(Row {
            date,
            values: parse_values(&record, columns.len(), &mut dropped_cells),
        });
    }

    if dropped_cells > 0 {
        warn!(
            file = %path.display(),
            cells = dropped_cells,
            "non-numeric cells treated as missing"
        );
    }
    debug!(file = %path.display(), series = columns.len(), rows = rows.len(), "read table file");

    Ok(Table::new(columns, rows))
}

/// Remove `token` wherever it appears in `name`, then trim.
///
/// A UTF-8 BOM (as emitted by Excel on the first header) is stripped first.
pub fn normalize_column_name(name: &str, token: &str) -> String {
    let name = name.trim_start_matches('\u{feff}');
    if token.is_empty() {
        return name.trim().to_string();
    }
    name.replace(token, "").trim().to_string()
}

fn list_table_files(directory: &Path, options: &LoadOptions) -> Result<Vec<PathBuf>, HpiError> {
    let io_err = |e: std::io::Error| HpiError::Io {
        path: directory.to_path_buf(),
        message: format!("failed to list directory: {e}"),
    };

    let suffix = format!(".{}", options.extension);
    let mut files = Vec::new();
    for entry in fs::read_dir(directory).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.ends_with(&suffix) && path.is_file() {
            files.push(path);
        } else {
            debug!(entry = %path.display(), "skipping non-table entry");
        }
    }
    files.sort();
    Ok(files)
}

fn parse_values(record: &StringRecord, width: usize, dropped: &mut usize) -> Vec<Option<f64>> {
    (1..=width)
        .map(|idx| {
            let raw = record.get(idx).unwrap_or_default();
            let value = parse_value(raw);
            if value.is_none() && !is_missing_marker(raw) {
                *dropped += 1;
            }
            value
        })
        .collect()
}

fn parse_date_label(label: &str) -> Option<NaiveDate> {
    // FRED exports ISO dates; spreadsheet round-trips tend to produce the
    // slash forms or a midnight timestamp.
    const DATE_FMTS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    const DATETIME_FMTS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

    let label = label.trim();
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(label, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(label, fmt) {
            return Some(dt.date());
        }
    }
    None
}

fn is_missing_marker(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw == "."
}

fn parse_value(raw: &str) -> Option<f64> {
    if is_missing_marker(raw) {
        return None;
    }
    let v = raw.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
