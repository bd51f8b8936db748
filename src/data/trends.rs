//! Google Trends interest-over-time integration.
//!
//! The public web API is a three-step exchange:
//!
//! 1. a GET on the home page to obtain session cookies
//! 2. `explore`, which returns widget descriptors, each with a signed token
//! 3. `widgetdata/multiline` for the `TIMESERIES` widget, which returns the timeline
//!
//! JSON bodies are prefixed with an anti-XSSI guard (`)]}'`) that must be
//! stripped before decoding.

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::domain::{DateWindow, KeywordSet, State};
use crate::error::AppError;

pub const DEFAULT_TRENDS_URL: &str = "https://trends.google.com";
pub const DEFAULT_TRENDS_TZ: i32 = 480;

const EXPLORE_PATH: &str = "/trends/api/explore";
const MULTILINE_PATH: &str = "/trends/api/widgetdata/multiline";
const TIMESERIES_WIDGET: &str = "TIMESERIES";

/// One timeline observation, still as delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTrendPoint {
    /// Unix timestamp (seconds) as text.
    pub time: String,
    /// One score per keyword, in keyword order.
    pub values: Vec<i64>,
    pub is_partial: bool,
}

/// Timeline for a keyword set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTrendTable {
    pub keywords: Vec<String>,
    pub points: Vec<RawTrendPoint>,
}

/// Client for the trends API.
pub struct TrendsClient<'a> {
    client: &'a Client,
    base_url: &'a str,
    tz: i32,
}

impl<'a> TrendsClient<'a> {
    pub fn new(client: &'a Client, base_url: &'a str, tz: i32) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/'),
            tz,
        }
    }

    /// Fetch interest over `window` for `keywords` in `state`.
    ///
    /// An empty timeline is returned as an empty table.
    pub fn fetch_interest(
        &self,
        state: &State,
        keywords: &KeywordSet,
        window: &DateWindow,
    ) -> Result<RawTrendTable, AppError> {
        info!(
            keywords = ?keywords.as_slice(),
            geo = %state.geo(),
            timeframe = %window.timeframe(),
            "fetching search interest"
        );

        self.prime_cookies();
        let widget = self.explore(state, keywords, window)?;
        let body = self.multiline(state, &widget)?;
        let table = parse_timeline(&body, keywords)?;

        if table.points.is_empty() {
            warn!("trends source returned no data for the window");
        } else {
            info!(points = table.points.len(), "search interest fetched");
        }
        Ok(table)
    }

    /// The API rejects cookie-less sessions with 429s; a failed priming call
    /// is only logged since the following request reports the real error.
    fn prime_cookies(&self) {
        let url = format!("{}/", self.base_url);
        match self.client.get(&url).query(&[("geo", "US")]).send() {
            Ok(resp) => debug!(status = %resp.status(), "trends session primed"),
            Err(e) => warn!(error = %e, "trends cookie priming failed"),
        }
    }

    fn explore(&self, state: &State, keywords: &KeywordSet, window: &DateWindow) -> Result<Widget, AppError> {
        let req = explore_payload(keywords, &window.timeframe(), &state.geo());
        let url = format!("{}{EXPLORE_PATH}", self.base_url);

        let resp = self
            .client
            .post(&url)
            .query(&[
                ("hl", state.locale()),
                ("tz", self.tz.to_string()),
                ("req", req.to_string()),
            ])
            .send()
            .map_err(|e| AppError::new(4, format!("Trends explore request failed: {e}")))?;

        let body = read_body(resp, "explore")?;
        let explore: ExploreResponse = serde_json::from_str(strip_xssi(&body)?)
            .map_err(|e| AppError::new(4, format!("Failed to parse trends explore response: {e}")))?;

        explore
            .widgets
            .into_iter()
            .find(|w| w.id == TIMESERIES_WIDGET)
            .ok_or_else(|| AppError::new(4, "Trends explore response has no TIMESERIES widget."))
    }

    fn multiline(&self, state: &State, widget: &Widget) -> Result<String, AppError> {
        let url = format!("{}{MULTILINE_PATH}", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("hl", state.locale()),
                ("tz", self.tz.to_string()),
                ("req", widget.request.to_string()),
                ("token", widget.token.clone()),
            ])
            .send()
            .map_err(|e| AppError::new(4, format!("Trends timeline request failed: {e}")))?;

        read_body(resp, "timeline")
    }
}

/// `req` payload for the explore call: one comparison item per keyword.
fn explore_payload(keywords: &KeywordSet, timeframe: &str, geo: &str) -> Value {
    let items: Vec<Value> = keywords
        .iter()
        .map(|kw| json!({ "keyword": kw, "time": timeframe, "geo": geo }))
        .collect();
    json!({ "comparisonItem": items, "category": 0, "property": "" })
}

fn read_body(resp: Response, what: &str) -> Result<String, AppError> {
    let status = resp.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(AppError::new(4, format!("Trends {what} request was rate limited (429).")));
    }
    if !status.is_success() {
        return Err(AppError::new(4, format!("Trends {what} request failed with status {status}.")));
    }
    resp.text()
        .map_err(|e| AppError::new(4, format!("Failed to read trends {what} response: {e}")))
}

/// Drop the anti-XSSI guard in front of the JSON object.
pub fn strip_xssi(body: &str) -> Result<&str, AppError> {
    body.find('{')
        .map(|idx| &body[idx..])
        .ok_or_else(|| AppError::new(4, "Trends response carries no JSON object."))
}

/// Decode a `multiline` body into a raw table for `keywords`.
pub fn parse_timeline(body: &str, keywords: &KeywordSet) -> Result<RawTrendTable, AppError> {
    let resp: MultilineResponse = serde_json::from_str(strip_xssi(body)?)
        .map_err(|e| AppError::new(4, format!("Failed to parse trends timeline: {e}")))?;

    let points = resp
        .default
        .timeline_data
        .into_iter()
        .map(|p| RawTrendPoint {
            time: p.time,
            values: p.value,
            is_partial: p.is_partial,
        })
        .collect();

    Ok(RawTrendTable {
        keywords: keywords.as_slice().to_vec(),
        points,
    })
}

#[derive(Debug, Deserialize)]
struct ExploreResponse {
    #[serde(default)]
    widgets: Vec<Widget>,
}

#[derive(Debug, Deserialize)]
struct Widget {
    id: String,
    #[serde(default)]
    token: String,
    #[serde(default)]
    request: Value,
}

#[derive(Debug, Deserialize)]
struct MultilineResponse {
    default: TimelineBody,
}

#[derive(Debug, Deserialize)]
struct TimelineBody {
    #[serde(rename = "timelineData", default)]
    timeline_data: Vec<TimelinePoint>,
}

#[derive(Debug, Deserialize)]
struct TimelinePoint {
    time: String,
    #[serde(default)]
    value: Vec<i64>,
    #[serde(rename = "isPartial", default)]
    is_partial: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> KeywordSet {
        KeywordSet::parse(&["hiking", "bread"]).unwrap()
    }

    #[test]
    fn strips_xssi_prefix() {
        assert_eq!(strip_xssi(")]}'\n{\"a\":1}").unwrap(), "{\"a\":1}");
        assert_eq!(strip_xssi(")]}',\n{}").unwrap(), "{}");
        assert_eq!(strip_xssi("<html>").unwrap_err().exit_code(), 4);
    }

    #[test]
    fn parses_timeline_points() {
        let body = r#")]}',
{"default":{"timelineData":[
  {"time":"1588464000","formattedTime":"May 3 - 9, 2020","value":[54,100],"hasData":[true,true]},
  {"time":"1589068800","formattedTime":"May 10 - 16, 2020","value":[61,87],"hasData":[true,true],"isPartial":true}
],"averages":[]}}"#;

        let table = parse_timeline(body, &keywords()).unwrap();
        assert_eq!(table.keywords, vec!["hiking".to_string(), "bread".to_string()]);
        assert_eq!(table.points.len(), 2);
        assert_eq!(table.points[0].time, "1588464000");
        assert_eq!(table.points[0].values, vec![54, 100]);
        assert!(!table.points[0].is_partial);
        assert!(table.points[1].is_partial);
    }

    #[test]
    fn empty_timeline_is_an_empty_table() {
        let body = ")]}',\n{\"default\":{\"timelineData\":[],\"averages\":[]}}";
        let table = parse_timeline(body, &keywords()).unwrap();
        assert!(table.points.is_empty());
        assert_eq!(table.keywords.len(), 2);
    }

    #[test]
    fn explore_payload_lists_keywords_in_order() {
        let req = explore_payload(&keywords(), "2020-01-01 2020-12-31", "US-WA");
        let items = req["comparisonItem"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["keyword"], "hiking");
        assert_eq!(items[1]["keyword"], "bread");
        assert_eq!(items[1]["geo"], "US-WA");
        assert_eq!(req["category"], 0);
    }
}
