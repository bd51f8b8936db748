//! Data generation: the two network fetches behind a run.
//!
//! - case counts per state (`covid`)
//! - search interest per keyword (`trends`)

use reqwest::blocking::Client;

use crate::config::Settings;
use crate::domain::{DateWindow, KeywordSet, State};
use crate::error::AppError;

pub mod covid;
pub mod trends;

pub use covid::{CovidClient, RawCovidRow, RawCovidTable};
pub use trends::{RawTrendPoint, RawTrendTable, TrendsClient};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Both raw tables of a run.
#[derive(Debug, Clone, Default)]
pub struct RawData {
    pub covid: RawCovidTable,
    pub trends: RawTrendTable,
}

/// Blocking HTTP client shared by both fetches.
pub fn http_client(settings: &Settings) -> Result<Client, AppError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(settings.http_timeout)
        .cookie_store(true)
        .build()
        .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))
}

/// Fetch case counts and search interest for the window.
pub fn generate(
    client: &Client,
    settings: &Settings,
    state: &State,
    keywords: &KeywordSet,
    window: &DateWindow,
) -> Result<RawData, AppError> {
    let covid = CovidClient::new(client, &settings.covid_url).fetch_state(state)?;
    let trends =
        TrendsClient::new(client, &settings.trends_url, settings.trends_tz).fetch_interest(state, keywords, window)?;
    Ok(RawData { covid, trends })
}
