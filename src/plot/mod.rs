//! Chart output.
//!
//! - series/bounds preparation (`series`)
//! - PNG rendering via Plotters (`png`)

pub mod png;
pub mod series;

pub use png::render_png;
pub use series::{ChartData, Series, build_chart_data};
