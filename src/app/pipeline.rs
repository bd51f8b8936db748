//! The run pipeline: resolve → fetch → process.
//!
//! Fetching is isolated in `run_pipeline`; `run_with_raw` takes pre-fetched
//! tables so everything after the network can run (and be tested) offline.

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::config::Settings;
use crate::data::{self, RawData};
use crate::domain::{DateWindow, RunConfig};
use crate::error::AppError;
use crate::input::{ResolvedInput, resolve_input};
use crate::process::{ProcessedData, process};

/// All computed outputs of a single `impacts run`.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub input: ResolvedInput,
    pub window: DateWindow,
    pub raw: RawData,
    pub processed: ProcessedData,
}

/// Execute the full pipeline for the window ending yesterday.
pub fn run_pipeline(config: &RunConfig, settings: &Settings) -> Result<RunOutput, AppError> {
    let today = Local::now().date_naive();
    let (input, window) = resolve(config, today)?;
    info!(state = input.state.name, start = %window.start, end = %window.end, "generating data");

    let client = data::http_client(settings)?;
    let raw = data::generate(&client, settings, &input.state, &input.keywords, &window)?;

    run_with_raw(input, window, raw)
}

/// Resolve inputs and the date window as of `today`.
pub fn resolve(config: &RunConfig, today: NaiveDate) -> Result<(ResolvedInput, DateWindow), AppError> {
    let input = resolve_input(&config.state, &config.keywords)?;
    let window = DateWindow::ending_yesterday(today, config.days)?;
    Ok((input, window))
}

/// Process pre-fetched tables.
pub fn run_with_raw(input: ResolvedInput, window: DateWindow, raw: RawData) -> Result<RunOutput, AppError> {
    info!("processing data");
    let processed = process(&input.keywords, &window, &raw)?;
    Ok(RunOutput {
        input,
        window,
        raw,
        processed,
    })
}
