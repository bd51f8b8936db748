//! Input/output helpers.
//!
//! - aggregate table CSV read/write (`aggregate`)
//! - output file naming (`OutputPaths`)

use std::path::{Path, PathBuf};

pub mod aggregate;

pub use aggregate::*;

/// Where a run's CSV and chart are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub csv: PathBuf,
    pub png: PathBuf,
}

impl OutputPaths {
    /// `<dir>/<state>_agg_data_frame.csv` and `<dir>/<state>_coronavirus_trend_impacts.png`.
    pub fn for_state(dir: &Path, state_name: &str) -> Self {
        Self {
            csv: dir.join(format!("{state_name}_agg_data_frame.csv")),
            png: dir.join(format!("{state_name}_coronavirus_trend_impacts.png")),
        }
    }

    /// Chart path next to a saved aggregate CSV.
    ///
    /// `X_agg_data_frame.csv` maps to `X_coronavirus_trend_impacts.png`; any
    /// other file name just swaps its extension.
    pub fn png_for_csv(csv: &Path) -> PathBuf {
        let stem = csv.file_stem().and_then(|s| s.to_str()).unwrap_or("aggregate");
        let name = match stem.strip_suffix("_agg_data_frame") {
            Some(state) => format!("{state}_coronavirus_trend_impacts.png"),
            None => format!("{stem}.png"),
        };
        csv.with_file_name(name)
    }

    /// State name encoded in an aggregate CSV file name, if any.
    pub fn state_from_csv(csv: &Path) -> Option<String> {
        csv.file_stem()?
            .to_str()?
            .strip_suffix("_agg_data_frame")
            .map(str::to_string)
    }
}
