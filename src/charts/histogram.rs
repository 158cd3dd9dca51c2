// src/charts/histogram.rs

use super::{Canvas, DrawResult, DEFAULT_COLOR};
use crate::process::stats::Bin;
use plotters::prelude::*;
use std::path::Path;

pub fn draw(path: &Path, canvas: &Canvas, title: &str, x_desc: &str, bins: &[Bin]) -> DrawResult {
    let root = BitMapBackend::new(path, canvas.size).into_drawing_area();
    root.fill(&WHITE)?;

    let lo = bins.first().map_or(0.0, |b| b.lo);
    let hi = bins.last().map_or(1.0, |b| b.hi);
    let top = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64 * 1.1;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(canvas.px(12.0));
    if canvas.annotate {
        builder
            .caption(title, ("sans-serif", canvas.px(16.0) as f64))
            .x_label_area_size(canvas.px(40.0))
            .y_label_area_size(canvas.px(50.0));
    }
    let mut chart = builder.build_cartesian_2d(lo..hi, 0f64..top)?;

    if canvas.annotate {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(x_desc)
            .y_desc("Frequency")
            .draw()?;
    }

    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], DEFAULT_COLOR.filled())
    }))?;
    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], BLACK.stroke_width(1))
    }))?;

    root.present()?;
    Ok(())
}
