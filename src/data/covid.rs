//! Bing COVID-19 case-count CSV.
//!
//! The upstream file holds every region worldwide, one row per region per day.
//! We stream it and keep only state-level rows for one U.S. state:
//! `AdminRegion1` equal to the state name and `AdminRegion2` blank.
//! Cells are kept as text; the processor owns type coercion.

use std::collections::HashMap;
use std::io::Read;

use csv::StringRecord;
use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::domain::State;
use crate::error::AppError;

pub const DEFAULT_COVID_URL: &str =
    "https://raw.githubusercontent.com/microsoft/Bing-COVID-19-Data/master/data/Bing-COVID19-Data.csv";

const COL_UPDATED: &str = "updated";
const COL_CONFIRMED: &str = "confirmed";
const COL_DEATHS: &str = "deaths";
const COL_RECOVERED: &str = "recovered";
const COL_REGION1: &str = "adminregion1";
const COL_REGION2: &str = "adminregion2";

const REQUIRED_COLUMNS: [&str; 6] = [
    COL_UPDATED,
    COL_CONFIRMED,
    COL_DEATHS,
    COL_RECOVERED,
    COL_REGION1,
    COL_REGION2,
];

/// A state-level source row, still text-valued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCovidRow {
    /// 1-based line in the source file.
    pub line: usize,
    pub updated: String,
    pub confirmed: String,
    pub deaths: String,
    pub recovered: String,
}

/// Rows kept for the state, plus how many source rows were scanned.
#[derive(Debug, Clone, Default)]
pub struct RawCovidTable {
    pub rows: Vec<RawCovidRow>,
    pub rows_read: usize,
}

/// Client for the case-count CSV.
pub struct CovidClient<'a> {
    client: &'a Client,
    url: &'a str,
}

impl<'a> CovidClient<'a> {
    pub fn new(client: &'a Client, url: &'a str) -> Self {
        Self { client, url }
    }

    /// Download the CSV and keep the state-level rows for `state`.
    pub fn fetch_state(&self, state: &State) -> Result<RawCovidTable, AppError> {
        info!(url = self.url, state = state.name, "fetching case counts");

        let resp = self
            .client
            .get(self.url)
            .send()
            .map_err(|e| AppError::new(4, format!("Case-data request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Case-data request failed with status {}.", resp.status()),
            ));
        }

        let table = read_state_rows(resp, state)?;
        info!(rows_read = table.rows_read, rows_kept = table.rows.len(), "case counts fetched");
        Ok(table)
    }
}

/// Stream a case-count CSV and keep state-level rows for `state`.
pub fn read_state_rows<R: Read>(reader: R, state: &State) -> Result<RawCovidTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(4, format!("Failed to read case-data headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    for col in REQUIRED_COLUMNS {
        if !header_map.contains_key(col) {
            return Err(AppError::new(
                4,
                format!("Case-data schema changed: missing column `{col}`."),
            ));
        }
    }

    let mut table = RawCovidTable::default();
    for (idx, result) in reader.records().enumerate() {
        // Records start on line 2, after the header.
        let line = idx + 2;
        table.rows_read += 1;

        let record = result.map_err(|e| AppError::new(4, format!("Case-data parse error on line {line}: {e}")))?;

        let region1 = cell(&record, &header_map, COL_REGION1);
        let region2 = cell(&record, &header_map, COL_REGION2);
        if !region2.is_empty() || !region1.eq_ignore_ascii_case(state.name) {
            continue;
        }

        table.rows.push(RawCovidRow {
            line,
            updated: cell(&record, &header_map, COL_UPDATED).to_string(),
            confirmed: cell(&record, &header_map, COL_CONFIRMED).to_string(),
            deaths: cell(&record, &header_map, COL_DEATHS).to_string(),
            recovered: cell(&record, &header_map, COL_RECOVERED).to_string(),
        });
    }

    debug!(state = state.name, kept = table.rows.len(), "filtered case rows");
    Ok(table)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Strip a UTF-8 BOM on the first header.
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

/// Trimmed cell for a known column; short rows read as blank.
fn cell<'r>(record: &'r StringRecord, header_map: &HashMap<String, usize>, name: &str) -> &'r str {
    header_map
        .get(name)
        .and_then(|&idx| record.get(idx))
        .map(str::trim)
        .unwrap_or("")
}
