//! Aggregate table CSV read/write.
//!
//! Layout: `week,confirmed,deaths,recovered,<keyword...>,is_partial`.
//! Missing values are blank cells and interest means keep full `f64`
//! precision. The reader accepts exactly what the writer
//! produces so a saved table can be re-plotted offline.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{AggregateRecord, AggregateTable};
use crate::error::AppError;

const LEADING: [&str; 4] = ["week", "confirmed", "deaths", "recovered"];
const TRAILING: &str = "is_partial";

/// Write the aggregate table to `path`.
pub fn write_aggregate_csv(path: &Path, table: &AggregateTable) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create aggregate CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(table.columns())
        .map_err(|e| AppError::new(2, format!("Failed to write aggregate CSV header: {e}")))?;

    for rec in &table.records {
        let mut row = vec![
            rec.week.format("%Y-%m-%d").to_string(),
            fmt_opt(rec.confirmed),
            fmt_opt(rec.deaths),
            fmt_opt(rec.recovered),
        ];
        row.extend(rec.interest.iter().map(|v| fmt_opt(*v)));
        row.push(fmt_opt(rec.is_partial));

        writer
            .write_record(&row)
            .map_err(|e| AppError::new(2, format!("Failed to write aggregate CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush aggregate CSV: {e}")))?;
    Ok(())
}

/// Read an aggregate table previously written by `write_aggregate_csv`.
pub fn read_aggregate_csv(path: &Path) -> Result<AggregateTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open aggregate CSV '{}': {e}", path.display())))?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read aggregate CSV headers: {e}")))?
        .clone();
    let names: Vec<&str> = headers.iter().collect();

    let well_formed = names.len() >= LEADING.len() + 1
        && names[..LEADING.len()] == LEADING
        && names.last() == Some(&TRAILING);
    if !well_formed {
        return Err(AppError::new(
            2,
            format!("'{}' is not an aggregate table (header: {names:?}).", path.display()),
        ));
    }
    let keywords: Vec<String> = names[LEADING.len()..names.len() - 1]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let bad = |msg: String| AppError::new(2, format!("Aggregate CSV line {line}: {msg}"));

        let record = result.map_err(|e| bad(e.to_string()))?;
        if record.len() != names.len() {
            return Err(bad(format!("expected {} cells, got {}", names.len(), record.len())));
        }

        let week = NaiveDate::parse_from_str(&record[0], "%Y-%m-%d").map_err(|e| bad(format!("week: {e}")))?;
        let confirmed = parse_opt::<u64>(&record[1]).map_err(|e| bad(format!("confirmed: {e}")))?;
        let deaths = parse_opt::<u64>(&record[2]).map_err(|e| bad(format!("deaths: {e}")))?;
        let recovered = parse_opt::<u64>(&record[3]).map_err(|e| bad(format!("recovered: {e}")))?;
        let interest = (0..keywords.len())
            .map(|k| parse_opt::<f64>(&record[LEADING.len() + k]).map_err(|e| bad(format!("{}: {e}", keywords[k]))))
            .collect::<Result<Vec<_>, _>>()?;
        let is_partial = parse_opt::<bool>(&record[names.len() - 1]).map_err(|e| bad(format!("is_partial: {e}")))?;

        records.push(AggregateRecord {
            week,
            confirmed,
            deaths,
            recovered,
            interest,
            is_partial,
        });
    }

    Ok(AggregateTable { keywords, records })
}

fn fmt_opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_opt<T: std::str::FromStr>(s: &str) -> Result<Option<T>, String>
where
    T::Err: std::fmt::Display,
{
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<T>().map(Some).map_err(|e| format!("'{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> AggregateTable {
        let d = |m, day| NaiveDate::from_ymd_opt(2020, m, day).unwrap();
        AggregateTable {
            keywords: vec!["hiking".to_string(), "sourdough bread".to_string()],
            records: vec![
                AggregateRecord {
                    week: d(5, 3),
                    confirmed: Some(1200),
                    deaths: Some(40),
                    recovered: None,
                    interest: vec![Some(42.5), Some(100.0)],
                    is_partial: Some(false),
                },
                AggregateRecord {
                    week: d(5, 10),
                    confirmed: Some(1300),
                    deaths: Some(41),
                    recovered: Some(9),
                    interest: vec![None, None],
                    is_partial: None,
                },
            ],
        }
    }

    #[test]
    fn written_table_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Ohio_agg_data_frame.csv");
        let table = sample_table();

        write_aggregate_csv(&path, &table).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("week,confirmed,deaths,recovered,hiking,sourdough bread,is_partial\n"));
        assert!(text.contains("2020-05-03,1200,40,,42.5,100,false\n"));
        assert!(text.contains("2020-05-10,1300,41,9,,,\n"));

        assert_eq!(read_aggregate_csv(&path).unwrap(), table);
    }

    #[test]
    fn fractional_means_read_back_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Ohio_agg_data_frame.csv");
        let mut table = sample_table();
        table.records[0].interest = vec![Some(100.0 / 3.0), Some(200.0 / 7.0)];

        write_aggregate_csv(&path, &table).unwrap();
        let back = read_aggregate_csv(&path).unwrap();
        assert_eq!(back.records[0].interest, vec![Some(100.0 / 3.0), Some(200.0 / 7.0)]);
        assert_eq!(back, table);
    }

    #[test]
    fn foreign_csv_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();
        assert_eq!(read_aggregate_csv(&path).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn header_only_table_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        let table = AggregateTable {
            keywords: vec!["hiking".to_string()],
            records: vec![],
        };
        write_aggregate_csv(&path, &table).unwrap();
        assert_eq!(read_aggregate_csv(&path).unwrap(), table);
    }
}
