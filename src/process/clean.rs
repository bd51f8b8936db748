//! Cleaning of the raw tables: typed dates and counts, window clipping, and
//! one row per date in ascending order.
//!
//! Malformed cells are errors (exit code 3); nothing is silently skipped.

use chrono::{DateTime, NaiveDate};

use crate::data::{RawCovidTable, RawTrendTable};
use crate::domain::{CovidRecord, DateWindow, KeywordSet, TrendRecord, TrendTable, week_start};
use crate::error::AppError;

/// Coerce case rows, keep those inside `window`, sort and de-duplicate.
pub fn clean_covid(raw: &RawCovidTable, window: &DateWindow) -> Result<Vec<CovidRecord>, AppError> {
    let mut out = Vec::with_capacity(raw.rows.len());
    for row in &raw.rows {
        let date = parse_date(&row.updated)
            .map_err(|e| AppError::new(3, format!("Case data line {}: {e}", row.line)))?;
        if !window.contains(date) {
            continue;
        }

        let count = |name: &str, s: &str| {
            parse_count(s).map_err(|e| AppError::new(3, format!("Case data line {}, `{name}`: {e}", row.line)))
        };

        out.push(CovidRecord {
            date,
            confirmed: count("confirmed", &row.confirmed)?,
            deaths: count("deaths", &row.deaths)?,
            recovered: count("recovered", &row.recovered)?,
        });
    }

    Ok(sorted_unique(out, |r| r.date))
}

/// Coerce trend points, keep weeks overlapping `window`, sort and de-duplicate.
pub fn clean_trends(
    raw: &RawTrendTable,
    keywords: &KeywordSet,
    window: &DateWindow,
) -> Result<TrendTable, AppError> {
    if !raw.points.is_empty() && raw.keywords != keywords.as_slice() {
        return Err(AppError::new(
            3,
            format!(
                "Trend table columns {:?} do not match keywords {:?}.",
                raw.keywords,
                keywords.as_slice()
            ),
        ));
    }

    let first_week = week_start(window.start);
    let mut out = Vec::with_capacity(raw.points.len());
    for (idx, point) in raw.points.iter().enumerate() {
        let date = parse_timestamp(&point.time)
            .map_err(|e| AppError::new(3, format!("Trend point {idx}: {e}")))?;
        // Weekly points are dated on the Sunday starting the week, which may
        // fall before the window start.
        if week_start(date) < first_week || date > window.end {
            continue;
        }

        if point.values.len() != keywords.len() {
            return Err(AppError::new(
                3,
                format!(
                    "Trend point {idx}: expected {} scores, got {}.",
                    keywords.len(),
                    point.values.len()
                ),
            ));
        }

        let scores = point
            .values
            .iter()
            .map(|&v| {
                u8::try_from(v)
                    .ok()
                    .filter(|s| *s <= 100)
                    .ok_or_else(|| AppError::new(3, format!("Trend point {idx}: score {v} outside 0..=100.")))
            })
            .collect::<Result<Vec<u8>, AppError>>()?;

        out.push(TrendRecord {
            date,
            scores,
            is_partial: point.is_partial,
        });
    }

    Ok(TrendTable {
        keywords: keywords.as_slice().to_vec(),
        records: sorted_unique(out, |r| r.date),
    })
}

/// Sort by date and keep the last row seen for each date.
fn sorted_unique<T>(mut rows: Vec<T>, date: impl Fn(&T) -> NaiveDate) -> Vec<T> {
    rows.sort_by_key(|r| date(r));
    let mut out: Vec<T> = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(last) = out.last_mut() {
            if date(last) == date(&row) {
                *last = row;
                continue;
            }
        }
        out.push(row);
    }
    out
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // The case-data file has used both US and ISO layouts over its lifetime.
    const FMTS: [&str; 3] = ["%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d"];
    let s = s.trim();
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!("invalid date '{s}'. Expected MM/DD/YYYY, YYYY-MM-DD or YYYY/MM/DD."))
}

fn parse_timestamp(s: &str) -> Result<NaiveDate, String> {
    let secs = s
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid timestamp '{s}': {e}"))?;
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| format!("timestamp '{s}' out of range"))
}

/// Blank is missing; integral floats (`"12.0"`) are accepted.
pub(crate) fn parse_count(s: &str) -> Result<Option<u64>, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    if let Ok(v) = s.parse::<u64>() {
        return Ok(Some(v));
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => Ok(Some(v as u64)),
        _ => Err(format!("invalid count '{s}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RawCovidRow, RawTrendPoint};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn window() -> DateWindow {
        DateWindow {
            start: d(2020, 5, 1),
            end: d(2020, 5, 31),
        }
    }

    fn covid_row(line: usize, updated: &str, confirmed: &str) -> RawCovidRow {
        RawCovidRow {
            line,
            updated: updated.to_string(),
            confirmed: confirmed.to_string(),
            deaths: "1".to_string(),
            recovered: String::new(),
        }
    }

    #[test]
    fn covid_rows_are_clipped_sorted_and_unique() {
        let raw = RawCovidTable {
            rows: vec![
                covid_row(2, "05/03/2020", "30"),
                covid_row(3, "04/30/2020", "1"),
                covid_row(4, "2020-05-02", "20"),
                covid_row(5, "05/03/2020", "31"),
                covid_row(6, "06/01/2020", "99"),
            ],
            rows_read: 5,
        };

        let rows = clean_covid(&raw, &window()).unwrap();
        let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d(2020, 5, 2), d(2020, 5, 3)]);
        assert_eq!(rows[1].confirmed, Some(31));
        assert_eq!(rows[0].recovered, None);
    }

    #[test]
    fn malformed_count_is_a_processing_error() {
        let raw = RawCovidTable {
            rows: vec![covid_row(7, "05/03/2020", "lots")],
            rows_read: 1,
        };
        let err = clean_covid(&raw, &window()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.message().contains("line 7"));
    }

    #[test]
    fn counts_accept_integral_floats() {
        assert_eq!(parse_count("12.0"), Ok(Some(12)));
        assert_eq!(parse_count(""), Ok(None));
        assert!(parse_count("-3").is_err());
        assert!(parse_count("1.5").is_err());
    }

    fn point(time: &str, values: Vec<i64>) -> RawTrendPoint {
        RawTrendPoint {
            time: time.to_string(),
            values,
            is_partial: false,
        }
    }

    #[test]
    fn trend_points_keep_the_week_overlapping_the_start() {
        let keywords = KeywordSet::parse(&["hiking"]).unwrap();
        let raw = RawTrendTable {
            keywords: vec!["hiking".to_string()],
            points: vec![
                // 2020-04-19 (Sunday, a week before the window's first week)
                point("1587254400", vec![10]),
                // 2020-04-26 (Sunday starting the week that holds May 1st)
                point("1587859200", vec![20]),
                // 2020-05-03
                point("1588464000", vec![30]),
            ],
        };

        let table = clean_trends(&raw, &keywords, &window()).unwrap();
        let dates: Vec<_> = table.records.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d(2020, 4, 26), d(2020, 5, 3)]);
        assert_eq!(table.records[1].scores, vec![30]);
    }

    #[test]
    fn trend_score_count_must_match_keywords() {
        let keywords = KeywordSet::parse(&["hiking", "bread"]).unwrap();
        let raw = RawTrendTable {
            keywords: vec!["hiking".to_string(), "bread".to_string()],
            points: vec![point("1588464000", vec![30])],
        };
        assert_eq!(clean_trends(&raw, &keywords, &window()).unwrap_err().exit_code(), 3);
    }

    #[test]
    fn trend_score_out_of_range_is_rejected() {
        let keywords = KeywordSet::parse(&["hiking"]).unwrap();
        let raw = RawTrendTable {
            keywords: vec!["hiking".to_string()],
            points: vec![point("1588464000", vec![101])],
        };
        assert_eq!(clean_trends(&raw, &keywords, &window()).unwrap_err().exit_code(), 3);
    }
}
