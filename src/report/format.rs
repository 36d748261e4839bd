//! Plain-text rendering of a return report.
//!
//! Formatting lives apart from the calculation so output changes stay local.

use crate::domain::{DayCount, ReturnReport};

/// Format the ranked returns with the period they cover.
pub fn format_returns(report: &ReturnReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Annualized total return {} -> {} ({:.3}y, {})\n",
        report.start,
        report.end,
        report.years,
        day_count_label(report.day_count),
    ));
    out.push_str(&format!(
        "Observations used: {} -> {}\n",
        report.start_observation, report.end_observation
    ));

    let width = report
        .series()
        .map(str::len)
        .max()
        .unwrap_or(0)
        .max("Series".len());

    out.push_str(&format!("{:>4}  {:<width$}  {:>10}\n", "#", "Series", "Return %"));
    for (rank, entry) in report.returns.iter().enumerate() {
        let value = match entry.annualized_pct {
            Some(v) => format!("{v:.2}"),
            None => "n/a".to_string(),
        };
        out.push_str(&format!("{:>4}  {:<width$}  {:>10}\n", rank + 1, entry.series, value));
    }

    out
}

fn day_count_label(day_count: DayCount) -> &'static str {
    match day_count {
        DayCount::Act365_25 => "act/365.25",
        DayCount::Act365F => "act/365f",
    }
}
