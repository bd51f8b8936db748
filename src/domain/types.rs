//! Shared domain types.
//!
//! Records here are the *cleaned* shapes: typed dates and counts. The raw,
//! text-valued tables produced by the fetchers live in `crate::data`.

use std::path::PathBuf;

use chrono::{Datelike, Days, Duration, NaiveDate};

use crate::error::AppError;

/// Default trailing window, in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 366;

/// Longest accepted window (about a century).
pub const MAX_WINDOW_DAYS: u32 = 36_600;

/// The trends source compares at most this many terms in one request.
pub const MAX_KEYWORDS: usize = 5;

/// A resolved U.S. state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    /// Full name, as used by the case-data source.
    pub name: &'static str,
    /// Two-letter postal abbreviation.
    pub abbr: &'static str,
}

impl State {
    /// Host-language locale sent to the trends source (`en-US-NY`).
    pub fn locale(&self) -> String {
        format!("en-US-{}", self.abbr)
    }

    /// Trends geography code (`US-NY`).
    pub fn geo(&self) -> String {
        format!("US-{}", self.abbr)
    }
}

/// Ordered, de-duplicated search terms.
///
/// Order is significant: it fixes the column order of every trend and
/// aggregate table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    /// Validate raw terms: trimmed, non-empty, distinct, at most `MAX_KEYWORDS`.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, AppError> {
        let mut terms: Vec<String> = Vec::with_capacity(raw.len());
        for term in raw {
            let term = term.as_ref().trim();
            if term.is_empty() {
                return Err(AppError::new(2, "Keywords must not be blank."));
            }
            if terms.iter().any(|t| t.eq_ignore_ascii_case(term)) {
                return Err(AppError::new(2, format!("Duplicate keyword '{term}'.")));
            }
            terms.push(term.to_string());
        }

        if terms.is_empty() {
            return Err(AppError::new(2, "At least one keyword is required."));
        }
        if terms.len() > MAX_KEYWORDS {
            return Err(AppError::new(
                2,
                format!("At most {MAX_KEYWORDS} keywords can be compared (got {}).", terms.len()),
            ));
        }

        Ok(Self(terms))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

/// Inclusive date range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// The `days` dates ending yesterday: `[today - days, today - 1]`.
    pub fn ending_yesterday(today: NaiveDate, days: u32) -> Result<Self, AppError> {
        if days == 0 {
            return Err(AppError::new(2, "Window must span at least one day."));
        }
        let out_of_range =
            || AppError::new(2, format!("Window of {days} days reaches past the supported date range."));
        let end = today.checked_sub_days(Days::new(1)).ok_or_else(out_of_range)?;
        let start = today
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or_else(out_of_range)?;
        Ok(Self { start, end })
    }

    /// Number of dates in the window.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Timeframe string understood by the trends source.
    pub fn timeframe(&self) -> String {
        format!("{} {}", self.start.format("%Y-%m-%d"), self.end.format("%Y-%m-%d"))
    }

    /// Week starts (Sundays) of every week overlapping the window, ascending.
    pub fn weeks(&self) -> Vec<NaiveDate> {
        let last = week_start(self.end);
        let mut out = Vec::new();
        let mut week = week_start(self.start);
        while week <= last {
            out.push(week);
            week += Duration::days(7);
        }
        out
    }
}

/// The Sunday starting the week that contains `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// One cleaned case-count row (state level, one per date).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CovidRecord {
    pub date: NaiveDate,
    pub confirmed: Option<u64>,
    pub deaths: Option<u64>,
    pub recovered: Option<u64>,
}

/// One cleaned search-interest row; `scores[i]` belongs to keyword `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendRecord {
    pub date: NaiveDate,
    pub scores: Vec<u8>,
    pub is_partial: bool,
}

/// Cleaned trend table with its keyword columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendTable {
    pub keywords: Vec<String>,
    pub records: Vec<TrendRecord>,
}

/// One weekly row of the joined table.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRecord {
    /// Sunday starting the week.
    pub week: NaiveDate,
    /// Last cumulative value seen in the week.
    pub confirmed: Option<u64>,
    pub deaths: Option<u64>,
    pub recovered: Option<u64>,
    /// Mean interest per keyword over the week's trend observations.
    pub interest: Vec<Option<f64>>,
    /// `None` when the week has no trend observations.
    pub is_partial: Option<bool>,
}

/// Weekly aggregate table.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateTable {
    pub keywords: Vec<String>,
    pub records: Vec<AggregateRecord>,
}

impl AggregateTable {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column names in output order.
    pub fn columns(&self) -> Vec<String> {
        let mut cols = vec![
            "week".to_string(),
            "confirmed".to_string(),
            "deaths".to_string(),
            "recovered".to_string(),
        ];
        cols.extend(self.keywords.iter().cloned());
        cols.push("is_partial".to_string());
        cols
    }
}

/// Settings for a single `impacts run`.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub state: String,
    pub keywords: Vec<String>,
    pub days: u32,
    pub output_dir: PathBuf,
    pub plot: bool,
    pub plot_width: u32,
    pub plot_height: u32,
}
