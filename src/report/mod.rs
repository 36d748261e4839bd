//! Annualized total return per series, and ranking of the results.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{DateArg, DayCount, ReturnReport, Row, SeriesReturn, Table};
use crate::error::HpiError;

pub mod format;

pub use format::format_returns;

/// Annualized total return of every series between two dates (Actual/365.25).
///
/// Dates may be given as `NaiveDate` or `YYYY-MM-DD` strings, in either order.
/// Each boundary uses the first row dated on or after it.
pub fn total_return(
    table: &Table,
    start_date: impl Into<DateArg>,
    final_date: impl Into<DateArg>,
) -> Result<ReturnReport, HpiError> {
    total_return_with(table, start_date, final_date, DayCount::default())
}

/// Same as [`total_return`] with an explicit day-count convention.
pub fn total_return_with(
    table: &Table,
    start_date: impl Into<DateArg>,
    final_date: impl Into<DateArg>,
    day_count: DayCount,
) -> Result<ReturnReport, HpiError> {
    let mut start = start_date.into().resolve()?;
    let mut end = final_date.into().resolve()?;
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }
    let start_row = select_row(table, start)?;
    let end_row = select_row(table, end)?;
    if start == end {
        return Err(HpiError::EmptyPeriod { date: start });
    }

    let years = day_count.year_fraction(start, end);

    let mut returns: Vec<SeriesReturn> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, series)| SeriesReturn {
            series: series.clone(),
            annualized_pct: annualize(start_row.get(idx), end_row.get(idx), years),
        })
        .collect();
    rank_descending(&mut returns);

    debug!(
        %start,
        %end,
        start_observation = %start_row.date,
        end_observation = %end_row.date,
        years,
        series = returns.len(),
        "computed annualized returns"
    );

    Ok(ReturnReport {
        start,
        end,
        start_observation: start_row.date,
        end_observation: end_row.date,
        day_count,
        years,
        returns,
    })
}

fn select_row(table: &Table, date: NaiveDate) -> Result<&Row, HpiError> {
    table.first_on_or_after(date).ok_or(HpiError::OutOfRange {
        requested: date,
        last: table.last_date(),
    })
}

fn annualize(start: Option<f64>, end: Option<f64>, years: f64) -> Option<f64> {
    let (start, end) = (start?, end?);
    let pct = (end - start) / start * 100.0 / years;
    // A zero start value divides by zero; keep ±inf, drop NaN.
    if pct.is_nan() { None } else { Some(pct) }
}

/// Sort highest return first, missing values last; ties keep column order.
fn rank_descending(returns: &mut [SeriesReturn]) {
    returns.sort_by(|a, b| match (a.annualized_pct, b.annualized_pct) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn table(columns: &[&str], rows: Vec<(NaiveDate, Vec<Option<f64>>)>) -> Table {
        Table::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.into_iter().map(|(date, values)| Row { date, values }).collect(),
        )
    }

    fn sample() -> Table {
        table(
            &["CA", "TX", "NY"],
            vec![
                (d(2019, 10, 1), vec![Some(90.0), Some(90.0), Some(90.0)]),
                (d(2020, 1, 1), vec![Some(100.0), Some(100.0), Some(100.0)]),
                (d(2020, 7, 1), vec![Some(104.0), Some(101.0), Some(99.0)]),
                (d(2021, 1, 1), vec![Some(110.0), Some(105.0), Some(97.0)]),
            ],
        )
    }

    #[test]
    fn annualizes_one_leap_year() {
        let report = total_return(&sample(), "2020-01-01", "2021-01-01").unwrap();
        let ca = report.get("CA").unwrap();
        let expected = 0.10 * 100.0 / (366.0 / 365.25);
        assert!((ca - expected).abs() < 1e-9, "got {ca}");
        assert!((ca - 9.98).abs() < 0.01);
        assert_eq!(report.start_observation, d(2020, 1, 1));
        assert_eq!(report.end_observation, d(2021, 1, 1));
    }

    #[test]
    fn argument_order_does_not_matter() {
        let t = sample();
        let forward = total_return(&t, "2020-01-01", "2021-01-01").unwrap();
        let backward = total_return(&t, "2021-01-01", "2020-01-01").unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn accepts_dates_and_strings_alike() {
        let t = sample();
        let text = total_return(&t, "2020-01-01", "2021-01-01").unwrap();
        let dates = total_return(&t, d(2020, 1, 1), d(2021, 1, 1)).unwrap();
        let mixed = total_return(&t, d(2020, 1, 1), String::from("2021-01-01")).unwrap();
        assert_eq!(text, dates);
        assert_eq!(text, mixed);
    }

    #[test]
    fn uses_first_row_on_or_after_each_boundary() {
        // 2019-12-15 resolves to the 2020-01-01 row, 2020-06-15 to 2020-07-01.
        let report = total_return(&sample(), "2019-12-15", "2020-06-15").unwrap();
        assert_eq!(report.start_observation, d(2020, 1, 1));
        assert_eq!(report.end_observation, d(2020, 7, 1));
        // Year fraction still comes from the requested dates.
        let years = (d(2020, 6, 15) - d(2019, 12, 15)).num_days() as f64 / 365.25;
        assert!((report.years - years).abs() < 1e-12);
        let ca = report.get("CA").unwrap();
        assert!((ca - 4.0 / years).abs() < 1e-9);
    }

    #[test]
    fn ranks_highest_return_first() {
        let t = table(
            &["A", "B", "C"],
            vec![
                (d(2020, 1, 1), vec![Some(100.0), Some(100.0), Some(100.0)]),
                (d(2021, 1, 1), vec![Some(105.0), Some(120.0), Some(97.0)]),
            ],
        );
        let report = total_return_with(&t, "2020-01-01", "2021-01-01", DayCount::Act365F).unwrap();
        let order: Vec<_> = report.series().collect();
        assert_eq!(order, vec!["B", "A", "C"]);
        let values: Vec<_> = report.returns.iter().map(|r| r.annualized_pct.unwrap()).collect();
        // 366 days over 365 fixed.
        let scale = 365.0 / 366.0;
        assert!((values[0] - 20.0 * scale).abs() < 1e-9);
        assert!((values[1] - 5.0 * scale).abs() < 1e-9);
        assert!((values[2] + 3.0 * scale).abs() < 1e-9);
    }

    #[test]
    fn ties_keep_column_order_and_missing_sort_last() {
        let t = table(
            &["A", "B", "C", "D"],
            vec![
                (d(2020, 1, 1), vec![None, Some(100.0), Some(100.0), Some(50.0)]),
                (d(2021, 1, 1), vec![Some(1.0), Some(110.0), Some(110.0), Some(55.0)]),
            ],
        );
        let report = total_return(&t, "2020-01-01", "2021-01-01").unwrap();
        let order: Vec<_> = report.series().collect();
        assert_eq!(order, vec!["B", "C", "D", "A"]);
        assert_eq!(report.get("A"), None);
    }

    #[test]
    fn malformed_date_is_invalid_argument() {
        let err = total_return(&sample(), "not-a-date", "2021-01-01").unwrap_err();
        assert!(err.is_invalid_argument());
        let err = total_return(&sample(), "2020-01-01", "2021/01/01").unwrap_err();
        assert_eq!(
            err,
            HpiError::InvalidDateArgument {
                input: "2021/01/01".to_string()
            }
        );
    }

    #[test]
    fn date_after_last_row_is_out_of_range() {
        let err = total_return(&sample(), "2020-01-01", "2021-01-02").unwrap_err();
        assert_eq!(
            err,
            HpiError::OutOfRange {
                requested: d(2021, 1, 2),
                last: Some(d(2021, 1, 1)),
            }
        );
    }

    #[test]
    fn empty_table_is_out_of_range() {
        let err = total_return(&Table::default(), "2020-01-01", "2021-01-01").unwrap_err();
        assert!(matches!(err, HpiError::OutOfRange { last: None, .. }));
    }

    #[test]
    fn equal_dates_are_rejected() {
        let err = total_return(&sample(), "2020-01-01", d(2020, 1, 1)).unwrap_err();
        assert_eq!(err, HpiError::EmptyPeriod { date: d(2020, 1, 1) });
    }

    #[test]
    fn equal_dates_past_the_end_are_out_of_range() {
        let err = total_return(&sample(), "2022-01-01", "2022-01-01").unwrap_err();
        assert_eq!(
            err,
            HpiError::OutOfRange {
                requested: d(2022, 1, 1),
                last: Some(d(2021, 1, 1)),
            }
        );
    }

    #[test]
    fn zero_start_value_is_infinite() {
        let t = table(
            &["Z"],
            vec![(d(2020, 1, 1), vec![Some(0.0)]), (d(2021, 1, 1), vec![Some(1.0)])],
        );
        let report = total_return(&t, "2020-01-01", "2021-01-01").unwrap();
        assert_eq!(report.get("Z"), Some(f64::INFINITY));
    }
}
