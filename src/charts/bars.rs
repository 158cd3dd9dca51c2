// src/charts/bars.rs

use super::{value_span, Canvas, DrawResult};
use crate::config::BarStyle;
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::path::Path;

/// One value per labelled category.
pub struct Bars<'a> {
    pub title: &'a str,
    pub y_desc: &'a str,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub color: RGBColor,
    pub style: BarStyle,
}

pub fn draw(path: &Path, canvas: &Canvas, bars: &Bars<'_>) -> DrawResult {
    let root = BitMapBackend::new(path, canvas.size).into_drawing_area();
    root.fill(&WHITE)?;

    let n = bars.values.len();
    let (lo, hi) = value_span(&bars.values, true);

    let mut builder = ChartBuilder::on(&root);
    builder.margin(canvas.px(12.0));
    if canvas.annotate {
        builder
            .caption(bars.title, ("sans-serif", canvas.px(16.0) as f64))
            .x_label_area_size(canvas.px(90.0))
            .y_label_area_size(canvas.px(60.0));
    }
    let mut chart = builder.build_cartesian_2d((0..n).into_segmented(), lo..hi)?;

    if canvas.annotate {
        let labels = &bars.labels;
        let formatter = |v: &SegmentValue<usize>| match v {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
                labels.get(*i).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&formatter)
            .x_label_style(
                TextStyle::from(("sans-serif", canvas.px(9.0) as f64).into_font())
                    .transform(FontTransform::Rotate90),
            )
            .y_desc(bars.y_desc)
            .draw()?;
    }

    match bars.style {
        BarStyle::Bar => {
            chart.draw_series(
                Histogram::vertical(&chart)
                    .style(bars.color.filled())
                    .margin(canvas.px(2.0))
                    .data(bars.values.iter().enumerate().map(|(i, v)| (i, *v))),
            )?;
        }
        BarStyle::Line => {
            let points: Vec<(SegmentValue<usize>, f64)> = bars
                .values
                .iter()
                .enumerate()
                .map(|(i, v)| (SegmentValue::CenterOf(i), *v))
                .collect();
            chart.draw_series(LineSeries::new(
                points,
                bars.color.stroke_width(canvas.px(1.5)),
            ))?;
        }
    }

    root.present()?;
    Ok(())
}
