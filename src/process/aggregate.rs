//! Weekly outer join of case counts and search interest.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{AggregateRecord, AggregateTable, CovidRecord, DateWindow, TrendTable, week_start};

#[derive(Debug, Default)]
struct WeekAcc {
    confirmed: Option<u64>,
    deaths: Option<u64>,
    recovered: Option<u64>,
    sums: Vec<f64>,
    n_trend: usize,
    partial: bool,
}

/// Join both cleaned tables on week.
///
/// A row exists for each week in `window` with data on either side. Case
/// fields carry the last cumulative value of the week; interest columns the
/// mean over the week's observations.
pub fn join_weekly(covid: &[CovidRecord], trends: &TrendTable, window: &DateWindow) -> AggregateTable {
    let n_keywords = trends.keywords.len();
    let first = week_start(window.start);
    let last = week_start(window.end);
    let in_range = |week: NaiveDate| week >= first && week <= last;

    let mut weeks: BTreeMap<NaiveDate, WeekAcc> = BTreeMap::new();

    for rec in covid {
        let week = week_start(rec.date);
        if !in_range(week) {
            continue;
        }
        let acc = weeks.entry(week).or_default();
        // Rows are date-ordered, so later values overwrite earlier ones.
        acc.confirmed = rec.confirmed.or(acc.confirmed);
        acc.deaths = rec.deaths.or(acc.deaths);
        acc.recovered = rec.recovered.or(acc.recovered);
    }

    for rec in &trends.records {
        let week = week_start(rec.date);
        if !in_range(week) {
            continue;
        }
        let acc = weeks.entry(week).or_default();
        if acc.sums.is_empty() {
            acc.sums = vec![0.0; n_keywords];
        }
        for (sum, &score) in acc.sums.iter_mut().zip(&rec.scores) {
            *sum += f64::from(score);
        }
        acc.n_trend += 1;
        acc.partial |= rec.is_partial;
    }

    let records = weeks
        .into_iter()
        .map(|(week, acc)| {
            let interest = if acc.n_trend == 0 {
                vec![None; n_keywords]
            } else {
                acc.sums.iter().map(|s| Some(s / acc.n_trend as f64)).collect()
            };
            AggregateRecord {
                week,
                confirmed: acc.confirmed,
                deaths: acc.deaths,
                recovered: acc.recovered,
                interest,
                is_partial: (acc.n_trend > 0).then_some(acc.partial),
            }
        })
        .collect();

    AggregateTable {
        keywords: trends.keywords.clone(),
        records,
    }
}
