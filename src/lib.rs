//! `state-hpi` library crate.
//!
//! Loads per-state house price index CSV files from a directory into one
//! date-indexed table and computes annualized total returns between two dates.
//!
//! ```no_run
//! let table = state_hpi::load_state_data("data/hpi")?;
//! let report = state_hpi::total_return(&table, "2015-01-01", "2020-01-01")?;
//! println!("{}", state_hpi::format_returns(&report));
//! # Ok::<(), state_hpi::HpiError>(())
//! ```

pub mod domain;
pub mod error;
pub mod io;
pub mod report;

pub use domain::{DateArg, DayCount, ReturnReport, Row, SeriesReturn, Table};
pub use error::HpiError;
pub use io::{LoadOptions, load_state_data, load_with_options};
pub use report::{format_returns, total_return, total_return_with};
