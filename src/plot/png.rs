//! PNG rendering of the weekly chart with Plotters.
//!
//! Case counts use the left axis; interest scores use a fixed 0-100 right axis
//! so keyword lines stay comparable across runs.

use std::path::Path;

use plotters::prelude::*;
use tracing::debug;

use crate::error::AppError;
use crate::plot::series::{ChartData, fmt_count, fmt_x};

/// Render `data` to a PNG at `path`.
pub fn render_png(path: &Path, data: &ChartData, width: u32, height: u32) -> Result<(), AppError> {
    if width < 200 || height < 150 {
        return Err(AppError::new(2, format!("Chart size {width}x{height} is too small (min 200x150).")));
    }

    let [x0, x1] = data.x_bounds;
    if !(x0.is_finite() && x1.is_finite()) || x1 <= x0 {
        return Err(AppError::new(5, "Invalid chart x bounds."));
    }

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&data.title, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .right_y_label_area_size(60)
        .build_cartesian_2d(x0..x1, 0f64..data.cases_max)
        .map_err(draw_err)?
        .set_secondary_coord(x0..x1, 0f64..100f64);

    chart
        .configure_mesh()
        .x_labels(8)
        .y_labels(8)
        .x_label_formatter(&|v| fmt_x(*v))
        .y_label_formatter(&|v| fmt_count(*v))
        .x_desc("Week")
        .y_desc("Cases")
        .draw()
        .map_err(draw_err)?;

    chart
        .configure_secondary_axes()
        .y_desc("Search interest (0-100)")
        .draw()
        .map_err(draw_err)?;

    for (idx, series) in data.cases.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(series.points.iter().copied(), color.stroke_width(2)))
            .map_err(draw_err)?
            .label(&series.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    // Offset the palette so keyword lines never reuse a case-line colour.
    let offset = data.cases.len();
    for (idx, series) in data.interest.iter().enumerate() {
        let color = Palette99::pick(offset + idx).to_rgba();
        chart
            .draw_secondary_series(LineSeries::new(series.points.iter().copied(), color.stroke_width(2)))
            .map_err(draw_err)?
            .label(&series.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    if data.series_count() > 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_err)?;
    }

    root.present().map_err(draw_err)?;
    debug!(path = %path.display(), series = data.series_count(), "chart rendered");
    Ok(())
}

fn draw_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::new(5, format!("Failed to render chart: {e}"))
}
