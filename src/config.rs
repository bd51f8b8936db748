//! Runtime settings resolved from the environment (and `.env`).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::data::covid::DEFAULT_COVID_URL;
use crate::data::trends::{DEFAULT_TRENDS_TZ, DEFAULT_TRENDS_URL};
use crate::error::AppError;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;
const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Source URLs, HTTP behaviour, and default output location.
#[derive(Debug, Clone)]
pub struct Settings {
    /// CSV with per-region case counts (`IMPACTS_COVID_URL`).
    pub covid_url: String,
    /// Trends API host (`IMPACTS_TRENDS_URL`).
    pub trends_url: String,
    /// Timezone offset in minutes sent to the trends API (`IMPACTS_TRENDS_TZ`).
    pub trends_tz: i32,
    /// Per-request timeout (`IMPACTS_HTTP_TIMEOUT_SECS`).
    pub http_timeout: Duration,
    /// Where CSV/PNG outputs land unless `--output-dir` is given (`IMPACTS_OUTPUT_DIR`).
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            covid_url: DEFAULT_COVID_URL.to_string(),
            trends_url: DEFAULT_TRENDS_URL.to_string(),
            trends_tz: DEFAULT_TRENDS_TZ,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults for unset variables.
    ///
    /// Set-but-unparseable numbers are an error rather than a silent default.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let trends_tz = match env::var("IMPACTS_TRENDS_TZ") {
            Ok(raw) => raw
                .trim()
                .parse::<i32>()
                .map_err(|e| AppError::new(2, format!("Invalid IMPACTS_TRENDS_TZ '{raw}': {e}")))?,
            Err(_) => defaults.trends_tz,
        };

        let http_timeout = match env::var("IMPACTS_HTTP_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.trim().parse::<u64>().map_err(|e| {
                AppError::new(2, format!("Invalid IMPACTS_HTTP_TIMEOUT_SECS '{raw}': {e}"))
            })?),
            Err(_) => defaults.http_timeout,
        };

        Ok(Self {
            covid_url: env::var("IMPACTS_COVID_URL").unwrap_or(defaults.covid_url),
            trends_url: env::var("IMPACTS_TRENDS_URL").unwrap_or(defaults.trends_url),
            trends_tz,
            http_timeout,
            output_dir: env::var("IMPACTS_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        })
    }
}
