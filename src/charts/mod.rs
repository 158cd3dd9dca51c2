// src/charts/mod.rs
mod bars;
pub mod font;
mod histogram;
mod scatter;

use crate::config::{BarStyle, ChartSpec, OutputConfig};
use crate::error::{Result, WranglerError};
use crate::process::{convert, stats, Table};
use plotters::style::RGBColor;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{error, info, instrument};

type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// Matplotlib's default series colour.
pub const DEFAULT_COLOR: RGBColor = RGBColor(31, 119, 180);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirStatus {
    Created,
    Existing,
}

/// Make sure `path` is a directory. Safe to call repeatedly.
pub fn ensure_dir(path: &Path) -> Result<DirStatus> {
    if path.is_dir() {
        return Ok(DirStatus::Existing);
    }
    fs::create_dir_all(path).map_err(|source| WranglerError::OutputDir {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(DirStatus::Created)
}

/// Where charts go and how big they are.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub dir: PathBuf,
    pub size: (u32, u32),
    pub dpi: u32,
    pub annotate: bool,
}

impl Canvas {
    pub fn from_output(out: &OutputConfig, annotate: bool) -> Self {
        Self {
            dir: out.charts_path(),
            size: out.pixels(),
            dpi: out.dpi,
            annotate,
        }
    }

    /// `file` under the charts directory, with `.png` appended unless already present.
    pub fn path_for(&self, file: &str) -> PathBuf {
        let is_png = Path::new(file)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if is_png {
            self.dir.join(file)
        } else {
            self.dir.join(format!("{}.png", file))
        }
    }

    /// Points to pixels at this canvas' dpi.
    fn px(&self, points: f64) -> u32 {
        (points * self.dpi as f64 / 72.0).round().max(1.0) as u32
    }
}

/// Named colour (the ones the chart plan uses, plus a few) or `#rrggbb`.
pub fn parse_color(name: &str) -> Option<RGBColor> {
    let name = name.trim().to_ascii_lowercase();
    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some(RGBColor(channel(0)?, channel(2)?, channel(4)?));
    }
    let rgb = match name.as_str() {
        "blue" => (0, 0, 255),
        "pink" => (255, 192, 203),
        "orange" => (255, 165, 0),
        "teal" => (0, 128, 128),
        "sienna" => (160, 82, 45),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "purple" => (128, 0, 128),
        "brown" => (165, 42, 42),
        "navy" => (0, 0, 128),
        "gray" | "grey" => (128, 128, 128),
        "black" => (0, 0, 0),
        _ => return None,
    };
    Some(RGBColor(rgb.0, rgb.1, rgb.2))
}

/// Axis range covering `values` with a 5% pad; optionally anchored at zero.
fn value_span(values: &[f64], include_zero: bool) -> (f64, f64) {
    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if lo == hi {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    let lo = if include_zero && lo == 0.0 { 0.0 } else { lo - pad };
    (lo, hi + pad)
}

fn no_rows(path: &Path) -> WranglerError {
    WranglerError::ChartWrite {
        path: path.to_path_buf(),
        reason: "no rows to plot".into(),
    }
}

/// Render one chart from `table`. The table is used as given; exclusions
/// happen before this is called.
#[instrument(level = "info", skip(table, canvas), fields(kind = spec.kind(), file = spec.file()))]
pub fn render(table: &Table, spec: &ChartSpec, canvas: &Canvas) -> Result<PathBuf> {
    let path = canvas.path_for(spec.file());
    if table.is_empty() {
        return Err(no_rows(&path));
    }

    let drawn = match spec {
        ChartSpec::ByCategory {
            column,
            color,
            style,
            category,
            ..
        } => {
            let labels = table.column(category)?;
            let values = convert::numeric_column(table, column)?;
            let color = parse_color(color)
                .ok_or_else(|| WranglerError::Config(format!("unknown color {:?}", color)))?;
            bars::draw(
                &path,
                canvas,
                &bars::Bars {
                    title: column,
                    y_desc: column,
                    labels: labels.into_iter().map(str::to_string).collect(),
                    values,
                    color,
                    style: *style,
                },
            )
        }
        ChartSpec::Regression { x, y, title, .. } => {
            let points = convert::numeric_pairs(table, x, y)?;
            scatter::draw(&path, canvas, title, x, y, &points)
        }
        ChartSpec::Histogram {
            column,
            title,
            bins,
            ..
        } => {
            let values = convert::numeric_column(table, column)?;
            histogram::draw(&path, canvas, title, column, &stats::histogram(&values, *bins))
        }
        ChartSpec::Average {
            column,
            title,
            category,
            ..
        } => {
            let keys = table.column(category)?;
            let values = convert::numeric_column(table, column)?;
            let (labels, means): (Vec<String>, Vec<f64>) =
                stats::group_mean(&keys, &values).into_iter().unzip();
            bars::draw(
                &path,
                canvas,
                &bars::Bars {
                    title,
                    y_desc: column,
                    labels,
                    values: means,
                    color: DEFAULT_COLOR,
                    style: BarStyle::Bar,
                },
            )
        }
    };

    drawn.map_err(|e| WranglerError::ChartWrite {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    info!(path = %path.display(), "chart written");
    Ok(path)
}

/// Render every chart; a failure is logged and returned alongside the others.
pub fn render_all<'a>(
    table: &Table,
    specs: &'a [ChartSpec],
    canvas: &Canvas,
) -> Vec<(&'a ChartSpec, Result<PathBuf>)> {
    specs
        .iter()
        .map(|spec| {
            let result = render(table, spec, canvas);
            if let Err(e) = &result {
                error!(file = spec.file(), stage = e.stage(), error = %e, "chart skipped");
            }
            (spec, result)
        })
        .collect()
}
