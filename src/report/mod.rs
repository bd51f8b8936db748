//! Terminal report: what was requested, what came back, and a preview of
//! each table.
//!
//! Formatting lives here so the pipeline stays free of presentation code.

use crate::data::RawData;
use crate::domain::{AggregateTable, CovidRecord, DateWindow, TrendTable};
use crate::input::ResolvedInput;
use crate::process::ProcessedData;

/// Rows shown per table preview.
pub const PREVIEW_ROWS: usize = 5;

/// Full run summary printed after processing.
pub fn format_run_summary(
    input: &ResolvedInput,
    window: &DateWindow,
    raw: &RawData,
    processed: &ProcessedData,
) -> String {
    let mut out = String::new();

    out.push_str("=== impacts - COVID-19 vs. search interest ===\n");
    out.push_str(&format!(
        "State: {} ({}) | locale={} | geo={}\n",
        input.state.name,
        input.state.abbr,
        input.state.locale(),
        input.state.geo()
    ));
    out.push_str(&format!("Keywords: {}\n", input.keywords.as_slice().join(", ")));
    out.push_str(&format!(
        "Window: {} .. {} ({} days, {} weeks)\n",
        window.start,
        window.end,
        window.days(),
        window.weeks().len()
    ));
    out.push_str(&format!(
        "Case data: {} source rows scanned, {} state rows, {} in window\n",
        raw.covid.rows_read,
        raw.covid.rows.len(),
        processed.covid.len()
    ));
    out.push_str(&format!(
        "Trend data: {} points, {} in window\n",
        raw.trends.points.len(),
        processed.trends.records.len()
    ));

    out.push_str("\nCase data (cleaned):\n");
    out.push_str(&format_covid_head(&processed.covid, PREVIEW_ROWS));
    out.push_str("\nTrend data (cleaned):\n");
    out.push_str(&format_trend_head(&processed.trends, PREVIEW_ROWS));
    out.push_str("\nAggregate (weekly):\n");
    out.push_str(&format_aggregate_head(&processed.aggregate, PREVIEW_ROWS));
    out.push_str(&format!(
        "\nAggregate columns: {}\n",
        processed.aggregate.columns().join(", ")
    ));

    out
}

/// First `n` cleaned case rows.
pub fn format_covid_head(rows: &[CovidRecord], n: usize) -> String {
    let header = ["date", "confirmed", "deaths", "recovered"].map(String::from).to_vec();
    let body = rows
        .iter()
        .take(n)
        .map(|r| {
            vec![
                r.date.to_string(),
                fmt_opt(r.confirmed),
                fmt_opt(r.deaths),
                fmt_opt(r.recovered),
            ]
        })
        .collect::<Vec<_>>();
    format_table(&header, &body, rows.len())
}

/// First `n` cleaned trend rows.
pub fn format_trend_head(table: &TrendTable, n: usize) -> String {
    let mut header = vec!["date".to_string()];
    header.extend(table.keywords.iter().cloned());
    header.push("is_partial".to_string());

    let body = table
        .records
        .iter()
        .take(n)
        .map(|r| {
            let mut row = vec![r.date.to_string()];
            row.extend(r.scores.iter().map(|s| s.to_string()));
            row.push(r.is_partial.to_string());
            row
        })
        .collect::<Vec<_>>();
    format_table(&header, &body, table.records.len())
}

/// First `n` weekly rows.
pub fn format_aggregate_head(table: &AggregateTable, n: usize) -> String {
    let body = table
        .records
        .iter()
        .take(n)
        .map(|r| {
            let mut row = vec![
                r.week.to_string(),
                fmt_opt(r.confirmed),
                fmt_opt(r.deaths),
                fmt_opt(r.recovered),
            ];
            row.extend(r.interest.iter().map(|v| v.map(|x| format!("{x:.1}")).unwrap_or_else(|| "-".to_string())));
            row.push(fmt_opt(r.is_partial));
            row
        })
        .collect::<Vec<_>>();
    format_table(&table.columns(), &body, table.records.len())
}

/// Right-aligned columns with a dashed rule; notes hidden rows.
fn format_table(header: &[String], rows: &[Vec<String>], total: usize) -> String {
    if total == 0 {
        return "(empty)\n".to_string();
    }

    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(truncate(h, 16).chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: Vec<String>| {
        let parts: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:>w$}"))
            .collect();
        format!("{}\n", parts.join("  ").trim_end())
    };

    let mut out = String::new();
    out.push_str(&line(header.iter().map(|h| truncate(h, 16)).collect()));
    out.push_str(&line(widths.iter().map(|w| "-".repeat(*w)).collect()));
    for row in rows {
        out.push_str(&line(row.clone()));
    }
    if total > rows.len() {
        out.push_str(&format!("... {} more rows\n", total - rows.len()));
    }
    out
}

fn fmt_opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
