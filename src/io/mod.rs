//! Input/output helpers.
//!
//! - directory CSV ingest + merge (`ingest`)
//! - report and table exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
