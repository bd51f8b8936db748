//! Data processing: clean both raw tables and join them weekly.

use tracing::{debug, info};

use crate::data::RawData;
use crate::domain::{AggregateTable, CovidRecord, DateWindow, KeywordSet, TrendTable};
use crate::error::AppError;

pub mod aggregate;
pub mod clean;

pub use aggregate::join_weekly;
pub use clean::{clean_covid, clean_trends};

/// Cleaned case table, cleaned trend table, and their weekly join.
#[derive(Debug, Clone)]
pub struct ProcessedData {
    pub covid: Vec<CovidRecord>,
    pub trends: TrendTable,
    pub aggregate: AggregateTable,
}

/// Clean both tables and build the aggregate.
pub fn process(keywords: &KeywordSet, window: &DateWindow, raw: &RawData) -> Result<ProcessedData, AppError> {
    let covid = clean_covid(&raw.covid, window)?;
    debug!(rows = covid.len(), "cleaned case table");

    let trends = clean_trends(&raw.trends, keywords, window)?;
    debug!(rows = trends.records.len(), "cleaned trend table");

    let aggregate = join_weekly(&covid, &trends, window);
    info!(weeks = aggregate.records.len(), "aggregate table built");

    Ok(ProcessedData {
        covid,
        trends,
        aggregate,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::data::{RawCovidRow, RawCovidTable, RawTrendPoint, RawTrendTable};
    use crate::domain::week_start;

    fn raw_fixture(today: NaiveDate, days: i64) -> RawData {
        // Daily cases from well before the window up to today.
        let rows = (0..days + 20)
            .map(|i| {
                let date = today - Duration::days(i);
                RawCovidRow {
                    line: i as usize + 2,
                    updated: date.format("%m/%d/%Y").to_string(),
                    confirmed: (1000 - i).to_string(),
                    deaths: "3".to_string(),
                    recovered: String::new(),
                }
            })
            .collect();

        // Weekly interest dated on Sundays.
        let mut points = Vec::new();
        let mut week = week_start(today - Duration::days(days + 14));
        while week <= today {
            let ts = week.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
            points.push(RawTrendPoint {
                time: ts.to_string(),
                values: vec![50],
                is_partial: false,
            });
            week += Duration::days(7);
        }

        RawData {
            covid: RawCovidTable {
                rows_read: days as usize + 20,
                rows,
            },
            trends: RawTrendTable {
                keywords: vec!["hiking".to_string()],
                points,
            },
        }
    }

    #[test]
    fn aggregate_dates_are_strictly_increasing_within_the_window() {
        let today = NaiveDate::from_ymd_opt(2020, 9, 17).unwrap();
        let window = DateWindow::ending_yesterday(today, 366).unwrap();
        let keywords = KeywordSet::parse(&["hiking"]).unwrap();

        let out = process(&keywords, &window, &raw_fixture(today, 366)).unwrap();
        let weeks: Vec<_> = out.aggregate.records.iter().map(|r| r.week).collect();

        assert!(weeks.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(weeks.first().copied(), Some(week_start(window.start)));
        assert_eq!(weeks.last().copied(), Some(week_start(window.end)));
        assert_eq!(weeks, window.weeks());
        assert!(out.covid.iter().all(|r| window.contains(r.date)));
        assert_eq!(out.covid.len(), 366);
    }

    #[test]
    fn seven_day_window_yields_at_most_two_weeks() {
        let keywords = KeywordSet::parse(&["hiking"]).unwrap();
        for offset in 0..7 {
            let today = NaiveDate::from_ymd_opt(2020, 9, 17).unwrap() + Duration::days(offset);
            let window = DateWindow::ending_yesterday(today, 7).unwrap();
            let out = process(&keywords, &window, &raw_fixture(today, 7)).unwrap();
            let n = out.aggregate.records.len();
            assert!((1..=2).contains(&n), "offset {offset}: {n} rows");
        }
    }

    #[test]
    fn empty_raw_tables_process_to_empty_outputs() {
        let today = NaiveDate::from_ymd_opt(2020, 9, 17).unwrap();
        let window = DateWindow::ending_yesterday(today, 30).unwrap();
        let keywords = KeywordSet::parse(&["hiking"]).unwrap();

        let out = process(&keywords, &window, &RawData::default()).unwrap();
        assert!(out.covid.is_empty());
        assert!(out.trends.records.is_empty());
        assert!(out.aggregate.is_empty());
        assert_eq!(out.aggregate.keywords, vec!["hiking".to_string()]);
    }
}
