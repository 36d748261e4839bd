//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the merged, date-indexed table (`Table`, `Row`)
//! - date arguments and day-count conventions (`DateArg`, `DayCount`)
//! - return outputs (`ReturnReport`, `SeriesReturn`)

pub mod types;

pub use types::*;
