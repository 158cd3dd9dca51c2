// src/charts/scatter.rs

use super::{value_span, Canvas, DrawResult, DEFAULT_COLOR};
use crate::process::stats;
use plotters::prelude::*;
use std::path::Path;

/// Scatter of `points` plus their least-squares line, when one exists.
pub fn draw(
    path: &Path,
    canvas: &Canvas,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    points: &[(f64, f64)],
) -> DrawResult {
    let root = BitMapBackend::new(path, canvas.size).into_drawing_area();
    root.fill(&WHITE)?;

    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
    let (x0, x1) = value_span(&xs, false);
    let (y0, y1) = value_span(&ys, false);

    let mut builder = ChartBuilder::on(&root);
    builder.margin(canvas.px(12.0));
    if canvas.annotate {
        builder
            .caption(title, ("sans-serif", canvas.px(16.0) as f64))
            .x_label_area_size(canvas.px(40.0))
            .y_label_area_size(canvas.px(60.0));
    }
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    if canvas.annotate {
        chart
            .configure_mesh()
            .x_desc(x_desc)
            .y_desc(y_desc)
            .draw()?;
    }

    let radius = canvas.px(3.0);
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), radius, DEFAULT_COLOR.filled())),
    )?;

    if let Some((slope, intercept)) = stats::linear_fit(points) {
        let line = [x0, x1].into_iter().map(|x| (x, slope * x + intercept));
        chart.draw_series(LineSeries::new(line, RED.stroke_width(canvas.px(1.0))))?;
    }

    root.present()?;
    Ok(())
}
