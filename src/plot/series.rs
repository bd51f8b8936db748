//! Chart data preparation.
//!
//! All series and bounds are computed here, outside the drawing code, so the
//! shape of the chart can be tested without a rendering backend.

use chrono::{Datelike, NaiveDate};

use crate::domain::AggregateTable;

/// One line on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    /// `(x, y)` with `x` as days since the common era (see `date_to_x`).
    pub points: Vec<(f64, f64)>,
}

/// Everything the renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    /// Case-count lines, plotted against the left axis.
    pub cases: Vec<Series>,
    /// Interest lines (0-100), plotted against the right axis.
    pub interest: Vec<Series>,
    pub x_bounds: [f64; 2],
    pub cases_max: f64,
}

impl ChartData {
    pub fn series_count(&self) -> usize {
        self.cases.len() + self.interest.len()
    }
}

pub fn date_to_x(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

/// Tick label for an x value.
pub fn fmt_x(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Tick label for case counts (`12k`, `1.5M`).
pub fn fmt_count(y: f64) -> String {
    let abs = y.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", y / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.0}k", y / 1_000.0)
    } else {
        format!("{y:.0}")
    }
}

/// Build one line per numeric column that has at least one value.
pub fn build_chart_data(state_name: &str, table: &AggregateTable) -> ChartData {
    let xs: Vec<f64> = table.records.iter().map(|r| date_to_x(r.week)).collect();

    let case_columns: [(&str, Vec<Option<u64>>); 3] = [
        ("confirmed", table.records.iter().map(|r| r.confirmed).collect()),
        ("deaths", table.records.iter().map(|r| r.deaths).collect()),
        ("recovered", table.records.iter().map(|r| r.recovered).collect()),
    ];

    let cases: Vec<Series> = case_columns
        .into_iter()
        .filter_map(|(label, values)| {
            let values: Vec<Option<f64>> = values.into_iter().map(|v| v.map(|c| c as f64)).collect();
            series(label, &xs, &values)
        })
        .collect();

    let interest: Vec<Series> = table
        .keywords
        .iter()
        .enumerate()
        .filter_map(|(k, kw)| {
            let values: Vec<Option<f64>> = table
                .records
                .iter()
                .map(|r| r.interest.get(k).copied().flatten())
                .collect();
            series(kw, &xs, &values)
        })
        .collect();

    let cases_max = cases
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.1))
        .fold(0.0, f64::max);

    let title = if table.keywords.is_empty() {
        format!("{state_name}: COVID-19 cases")
    } else {
        format!("{state_name}: COVID-19 cases vs. search interest in {}", table.keywords.join(", "))
    };

    ChartData {
        title,
        cases,
        interest,
        x_bounds: x_bounds(&xs),
        // Leave headroom above the tallest line; keep a usable range when empty.
        cases_max: (cases_max * 1.05).max(1.0),
    }
}

fn series(label: &str, xs: &[f64], values: &[Option<f64>]) -> Option<Series> {
    let points: Vec<(f64, f64)> = xs
        .iter()
        .zip(values)
        .filter_map(|(&x, v)| v.map(|y| (x, y)))
        .collect();
    if points.is_empty() {
        None
    } else {
        Some(Series {
            label: label.to_string(),
            points,
        })
    }
}

fn x_bounds(xs: &[f64]) -> [f64; 2] {
    let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(min.is_finite() && max.is_finite()) {
        // Empty table: a one-week span around today keeps the axes drawable.
        let today = date_to_x(chrono::Local::now().date_naive());
        return [today - 7.0, today];
    }
    if max - min < 7.0 {
        return [min - 3.5, max + 3.5];
    }
    [min, max]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AggregateRecord;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, m, day).unwrap()
    }

    fn table() -> AggregateTable {
        AggregateTable {
            keywords: vec!["hiking".to_string(), "bread".to_string()],
            records: vec![
                AggregateRecord {
                    week: d(5, 3),
                    confirmed: Some(1000),
                    deaths: Some(10),
                    recovered: None,
                    interest: vec![Some(40.0), None],
                    is_partial: Some(false),
                },
                AggregateRecord {
                    week: d(5, 10),
                    confirmed: Some(2000),
                    deaths: Some(20),
                    recovered: None,
                    interest: vec![Some(60.0), None],
                    is_partial: Some(true),
                },
            ],
        }
    }

    #[test]
    fn one_line_per_populated_numeric_column() {
        let chart = build_chart_data("Ohio", &table());
        let case_labels: Vec<_> = chart.cases.iter().map(|s| s.label.as_str()).collect();
        let interest_labels: Vec<_> = chart.interest.iter().map(|s| s.label.as_str()).collect();

        assert_eq!(case_labels, vec!["confirmed", "deaths"]);
        assert_eq!(interest_labels, vec!["hiking"]);
        assert_eq!(chart.series_count(), 3);
        assert_eq!(chart.interest[0].points[1], (date_to_x(d(5, 10)), 60.0));
        assert!((chart.cases_max - 2100.0).abs() < 1e-9);
        assert_eq!(chart.x_bounds, [date_to_x(d(5, 3)), date_to_x(d(5, 10))]);
        assert!(chart.title.starts_with("Ohio: "));
        assert!(chart.title.ends_with("hiking, bread"));
    }

    #[test]
    fn empty_table_still_has_drawable_bounds() {
        let empty = AggregateTable {
            keywords: vec!["hiking".to_string()],
            records: vec![],
        };
        let chart = build_chart_data("Ohio", &empty);
        assert_eq!(chart.series_count(), 0);
        assert!(chart.x_bounds[1] > chart.x_bounds[0]);
        assert_eq!(chart.cases_max, 1.0);
    }

    #[test]
    fn tick_labels() {
        assert_eq!(fmt_x(date_to_x(d(5, 3))), "2020-05-03");
        assert_eq!(fmt_count(950.0), "950");
        assert_eq!(fmt_count(12_400.0), "12k");
        assert_eq!(fmt_count(1_500_000.0), "1.5M");
    }
}
