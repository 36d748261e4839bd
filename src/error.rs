use std::path::PathBuf;

use chrono::NaiveDate;

/// Errors produced while loading HPI files or computing returns.
///
/// Underlying library errors are flattened into `message` together with the
/// path they relate to, so the type stays `Clone` and comparable in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum HpiError {
    /// Directory listing or file open failure.
    Io { path: PathBuf, message: String },
    /// Malformed CSV framing or headers.
    Csv { path: PathBuf, message: String },
    /// A row label that cannot be read as a calendar date.
    DateLabel { path: PathBuf, label: String },
    /// A date argument that is not a `YYYY-MM-DD` string.
    InvalidDateArgument { input: String },
    /// No row on or after the requested date.
    OutOfRange {
        requested: NaiveDate,
        last: Option<NaiveDate>,
    },
    /// Start and end resolve to the same day, so no time has elapsed.
    EmptyPeriod { date: NaiveDate },
    /// Failure writing an export file.
    Export { path: PathBuf, message: String },
}

impl HpiError {
    /// True for the soft failure raised on a bad date argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, HpiError::InvalidDateArgument { .. })
    }
}

impl std::fmt::Display for HpiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HpiError::Io { path, message } => {
                write!(f, "I/O error on '{}': {message}", path.display())
            }
            HpiError::Csv { path, message } => {
                write!(f, "Invalid CSV '{}': {message}", path.display())
            }
            HpiError::DateLabel { path, label } => {
                write!(f, "Invalid date label '{label}' in '{}'", path.display())
            }
            HpiError::InvalidDateArgument { input } => {
                write!(f, "Invalid date argument '{input}'. Expected YYYY-MM-DD.")
            }
            HpiError::OutOfRange { requested, last: Some(last) } => {
                write!(f, "No observation on or after {requested} (last available: {last})")
            }
            HpiError::OutOfRange { requested, last: None } => {
                write!(f, "No observation on or after {requested} (table is empty)")
            }
            HpiError::EmptyPeriod { date } => {
                write!(f, "Start and end date are both {date}; cannot annualize a zero-length period")
            }
            HpiError::Export { path, message } => {
                write!(f, "Failed to write '{}': {message}", path.display())
            }
        }
    }
}

impl std::error::Error for HpiError {}
