//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while computing returns
//! - exported to JSON/CSV

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::HpiError;

/// Day-count convention for the year fraction of a return period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayCount {
    /// Actual/365.25, averaging leap years in.
    #[default]
    #[serde(rename = "act/365.25")]
    Act365_25,
    /// Actual/365 fixed.
    #[serde(rename = "act/365f")]
    Act365F,
}

impl DayCount {
    /// Convert a day count to its denominator.
    pub fn year_denominator(self) -> f64 {
        match self {
            DayCount::Act365_25 => 365.25,
            DayCount::Act365F => 365.0,
        }
    }

    /// Years between two dates, negative when `end` precedes `start`.
    pub fn year_fraction(self, start: NaiveDate, end: NaiveDate) -> f64 {
        (end - start).num_days() as f64 / self.year_denominator()
    }
}

/// A date argument: either an already-parsed calendar date or `YYYY-MM-DD` text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateArg {
    Date(NaiveDate),
    Text(String),
}

impl DateArg {
    pub const FORMAT: &'static str = "%Y-%m-%d";

    /// Resolve to a calendar date, parsing text strictly.
    pub fn resolve(&self) -> Result<NaiveDate, HpiError> {
        match self {
            DateArg::Date(date) => Ok(*date),
            DateArg::Text(text) => {
                let invalid = || HpiError::InvalidDateArgument { input: text.clone() };
                if text.trim() != text {
                    return Err(invalid());
                }
                NaiveDate::parse_from_str(text, Self::FORMAT).map_err(|_| invalid())
            }
        }
    }
}

impl From<NaiveDate> for DateArg {
    fn from(value: NaiveDate) -> Self {
        DateArg::Date(value)
    }
}

impl From<&str> for DateArg {
    fn from(value: &str) -> Self {
        DateArg::Text(value.to_string())
    }
}

impl From<String> for DateArg {
    fn from(value: String) -> Self {
        DateArg::Text(value)
    }
}

/// One observation date with a value slot per table column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

impl Row {
    pub fn get(&self, column: usize) -> Option<f64> {
        self.values.get(column).copied().flatten()
    }
}

/// Date-indexed table of named series.
///
/// Rows are unique per date and kept in ascending order; every row holds
/// exactly one slot per column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table, sorting rows by date and padding short rows.
    ///
    /// Repeated column names share one column, and rows sharing a date are
    /// folded together; in both cases a later present value overwrites an
    /// earlier one.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let mut unique = Vec::with_capacity(columns.len());
        let mapping = map_columns(&mut unique, &columns);
        let width = unique.len();

        let mut by_date: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
        for row in rows {
            let slot = by_date.entry(row.date).or_insert_with(|| vec![None; width]);
            for (value, &dst) in row.values.into_iter().zip(&mapping) {
                if value.is_some() {
                    slot[dst] = value;
                }
            }
        }
        Self {
            columns: unique,
            rows: collect_rows(by_date),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, series: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == series)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    /// Value of `series` on exactly `date`, if both exist and the cell is present.
    pub fn value(&self, date: NaiveDate, series: &str) -> Option<f64> {
        let column = self.column_index(series)?;
        let idx = self.rows.binary_search_by_key(&date, |r| r.date).ok()?;
        self.rows[idx].get(column)
    }

    /// First row dated on or after `date`.
    pub fn first_on_or_after(&self, date: NaiveDate) -> Option<&Row> {
        let idx = self.rows.partition_point(|r| r.date < date);
        self.rows.get(idx)
    }

    /// Outer join on the date key.
    ///
    /// Columns of `other` that are new are appended in order; a column name
    /// present in both tables maps to a single column, where present values
    /// from `other` take precedence.
    pub fn outer_join(&self, other: &Table) -> Table {
        let mut columns = self.columns.clone();
        let mapping = map_columns(&mut columns, &other.columns);
        let width = columns.len();

        let mut by_date: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
        for row in &self.rows {
            let mut values = row.values.clone();
            values.resize(width, None);
            by_date.insert(row.date, values);
        }
        for row in &other.rows {
            let slot = by_date.entry(row.date).or_insert_with(|| vec![None; width]);
            for (value, &dst) in row.values.iter().zip(&mapping) {
                if value.is_some() {
                    slot[dst] = *value;
                }
            }
        }

        Table {
            columns,
            rows: collect_rows(by_date),
        }
    }
}

/// Index of each name in `columns`, appending names not seen yet.
fn map_columns(columns: &mut Vec<String>, names: &[String]) -> Vec<usize> {
    names
        .iter()
        .map(|name| match columns.iter().position(|c| c == name) {
            Some(idx) => idx,
            None => {
                columns.push(name.clone());
                columns.len() - 1
            }
        })
        .collect()
}

fn collect_rows(by_date: BTreeMap<NaiveDate, Vec<Option<f64>>>) -> Vec<Row> {
    by_date
        .into_iter()
        .map(|(date, values)| Row { date, values })
        .collect()
}

/// Annualized return of one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesReturn {
    pub series: String,
    /// `None` when a boundary value is missing or the result is undefined.
    pub annualized_pct: Option<f64>,
}

/// Output of a return calculation, ranked from highest to lowest return.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnReport {
    /// Requested period after ordering.
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Dates of the rows actually used for each boundary.
    pub start_observation: NaiveDate,
    pub end_observation: NaiveDate,
    pub day_count: DayCount,
    pub years: f64,
    pub returns: Vec<SeriesReturn>,
}

impl ReturnReport {
    pub fn get(&self, series: &str) -> Option<f64> {
        self.returns
            .iter()
            .find(|r| r.series == series)
            .and_then(|r| r.annualized_pct)
    }

    pub fn series(&self) -> impl Iterator<Item = &str> {
        self.returns.iter().map(|r| r.series.as_str())
    }

    pub fn len(&self) -> usize {
        self.returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }
}
