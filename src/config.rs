// src/config.rs

use crate::error::{Result, WranglerError};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_URL: &str = "https://en.wikipedia.org/wiki/Road_safety_in_Europe";
pub const DEFAULT_TABLE_CLASS: &str = "wikitable";

// Canonical column names written to the CSV and referenced by the chart plan.
pub const COUNTRY: &str = "Country";
pub const YEAR: &str = "Year";
pub const AREA: &str = "Area (thousands of km2)";
pub const POPULATION: &str = "Population";
pub const GDP: &str = "GDP per capita";
pub const DENSITY: &str = "Population density (inhabitants per km2)";
pub const VEHICLES: &str = "Vehicle ownership (per thousand inhabitants)";
pub const DEATHS: &str = "Total road deaths";
pub const DEATH_RATE: &str = "Road deaths per million inhabitants";

/// Everything one run needs. `Config::default()` is the Road safety in Europe run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub source: SourceConfig,
    /// Output columns, in output order.
    pub columns: Vec<ColumnSpec>,
    /// Page headers that are present but deliberately not carried over.
    #[serde(default)]
    pub drop: Vec<String>,
    /// Canonical column the table is sorted (ascending, numerically) by.
    pub sort_by: String,
    /// Rows kept in the CSV but withheld from every chart.
    #[serde(default)]
    pub exclude: Option<ExcludeRows>,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub charts: Vec<ChartSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    pub url: String,
    pub table_class: String,
    /// No timeout unless set.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// One output column: either copied from a page header or filled with a constant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ColumnSpec {
    Mapped { source: String, name: String },
    Constant { name: String, constant: String },
}

impl ColumnSpec {
    pub fn mapped(source: &str, name: &str) -> Self {
        ColumnSpec::Mapped {
            source: source.to_string(),
            name: name.to_string(),
        }
    }

    pub fn constant(name: &str, value: &str) -> Self {
        ColumnSpec::Constant {
            name: name.to_string(),
            constant: value.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ColumnSpec::Mapped { name, .. } | ColumnSpec::Constant { name, .. } => name,
        }
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            ColumnSpec::Mapped { source, .. } => Some(source),
            ColumnSpec::Constant { .. } => None,
        }
    }
}

/// Withholds rows whose `column` matches the regex `pattern` (aggregate/total rows).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExcludeRows {
    pub column: String,
    pub pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Root every artifact is written under.
    pub dir: PathBuf,
    pub csv: String,
    pub charts_dir: String,
    pub summary: String,
    pub dpi: u32,
    pub width_in: f64,
    pub height_in: f64,
    /// Draw captions, axis labels and tick text.
    pub annotate: bool,
    /// TrueType font for chart text; common system locations are tried when unset.
    pub font: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            csv: "road_safety.csv".into(),
            charts_dir: "charts".into(),
            summary: "run_summary.json".into(),
            dpi: 300,
            width_in: 10.0,
            height_in: 6.0,
            annotate: true,
            font: None,
        }
    }
}

impl OutputConfig {
    pub fn csv_path(&self) -> PathBuf {
        self.dir.join(&self.csv)
    }

    pub fn charts_path(&self) -> PathBuf {
        self.dir.join(&self.charts_dir)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(&self.summary)
    }

    /// Pixel size of one figure.
    pub fn pixels(&self) -> (u32, u32) {
        let dpi = self.dpi as f64;
        (
            (self.width_in * dpi).round().max(1.0) as u32,
            (self.height_in * dpi).round().max(1.0) as u32,
        )
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BarStyle {
    #[default]
    Bar,
    Line,
}

fn default_category() -> String {
    COUNTRY.to_string()
}

fn default_bins() -> usize {
    10
}

/// One chart to render. `file` gets a `.png` extension if it has none.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    /// One bar (or line point) per category.
    ByCategory {
        file: String,
        column: String,
        color: String,
        #[serde(default)]
        style: BarStyle,
        #[serde(default = "default_category")]
        category: String,
    },
    /// Scatter of `y` against `x` with a least-squares line.
    Regression {
        file: String,
        x: String,
        y: String,
        title: String,
    },
    Histogram {
        file: String,
        column: String,
        title: String,
        #[serde(default = "default_bins")]
        bins: usize,
    },
    /// Mean of `column` per distinct `category`.
    Average {
        file: String,
        column: String,
        title: String,
        #[serde(default = "default_category")]
        category: String,
    },
}

impl ChartSpec {
    pub fn file(&self) -> &str {
        match self {
            ChartSpec::ByCategory { file, .. }
            | ChartSpec::Regression { file, .. }
            | ChartSpec::Histogram { file, .. }
            | ChartSpec::Average { file, .. } => file,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ChartSpec::ByCategory { .. } => "by_category",
            ChartSpec::Regression { .. } => "regression",
            ChartSpec::Histogram { .. } => "histogram",
            ChartSpec::Average { .. } => "average",
        }
    }

    /// Every column the chart reads.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            ChartSpec::ByCategory {
                column, category, ..
            }
            | ChartSpec::Average {
                column, category, ..
            } => vec![category.as_str(), column.as_str()],
            ChartSpec::Regression { x, y, .. } => vec![x.as_str(), y.as_str()],
            ChartSpec::Histogram { column, .. } => vec![column.as_str()],
        }
    }
}

fn by_category(file: &str, column: &str, color: &str) -> ChartSpec {
    ChartSpec::ByCategory {
        file: file.into(),
        column: column.into(),
        color: color.into(),
        style: BarStyle::Bar,
        category: default_category(),
    }
}

fn regression(x: &str, y: &str, title: &str) -> ChartSpec {
    ChartSpec::Regression {
        file: title.into(),
        x: x.into(),
        y: y.into(),
        title: title.into(),
    }
}

fn histogram(column: &str, title: &str) -> ChartSpec {
    ChartSpec::Histogram {
        file: title.into(),
        column: column.into(),
        title: title.into(),
        bins: default_bins(),
    }
}

fn average(column: &str, title: &str) -> ChartSpec {
    ChartSpec::Average {
        file: title.into(),
        column: column.into(),
        title: title.into(),
        category: default_category(),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig {
                url: DEFAULT_URL.into(),
                table_class: DEFAULT_TABLE_CLASS.into(),
                timeout_secs: None,
            },
            columns: vec![
                ColumnSpec::mapped("Country", COUNTRY),
                ColumnSpec::constant(YEAR, "2018"),
                ColumnSpec::mapped("Area\n(thousands of km2)[24]", AREA),
                ColumnSpec::mapped("Population in 2018[25]", POPULATION),
                ColumnSpec::mapped("GDP per capita in 2018[26]", GDP),
                ColumnSpec::mapped(
                    "Population density\n(inhabitants per km2) in 2017[27]",
                    DENSITY,
                ),
                ColumnSpec::mapped(
                    "Vehicle ownership\n(per thousand inhabitants) in 2016[28]",
                    VEHICLES,
                ),
                ColumnSpec::mapped("Total Road Deaths in 2018[30]", DEATHS),
                ColumnSpec::mapped(
                    "Road deaths\nper Million Inhabitants in 2018[30]",
                    DEATH_RATE,
                ),
            ],
            drop: vec![
                "Road Network Length\n(in km) in 2013[29]".into(),
                "Number of People Killed\nper Billion km[30]".into(),
                "Number of Seriously Injured in 2017/2018[30]".into(),
            ],
            sort_by: DEATH_RATE.into(),
            exclude: Some(ExcludeRows {
                column: COUNTRY.into(),
                pattern: r"(?i)^\s*(EU|European Union)\b".into(),
            }),
            output: OutputConfig::default(),
            charts: vec![
                by_category("AreaByCountry.png", AREA, "blue"),
                by_category("PopulationByCountry.png", POPULATION, "pink"),
                by_category("GDPByCountry.png", GDP, "orange"),
                by_category("VehicleByCountry.png", VEHICLES, "teal"),
                by_category("DeathByCountry.png", DEATHS, "sienna"),
                regression(POPULATION, VEHICLES, "Population vs Vehicle Ownership"),
                regression(POPULATION, DEATH_RATE, "Population vs Death"),
                regression(VEHICLES, DEATH_RATE, "Vehicle vs Death"),
                regression(GDP, DEATH_RATE, "GDP vs Death"),
                regression(AREA, VEHICLES, "Area vs Vehicle Ownership"),
                regression(AREA, POPULATION, "Area vs Population"),
                histogram(DENSITY, "Distribution of Population Density"),
                histogram(DEATHS, "Distribution of Deaths"),
                histogram(GDP, "Distribution of GDP"),
                histogram(VEHICLES, "Distribution of Vehicle Ownership"),
                histogram(DEATH_RATE, "Distribution of Deaths II"),
                average(AREA, "Average Area in different countries"),
                average(DEATHS, "Average Death by Country"),
            ],
        }
    }
}

impl Config {
    /// Read a YAML config file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| WranglerError::Config(format!("reading {:?}: {}", path, e)))?;
        let cfg: Config = serde_yaml::from_str(&text)
            .map_err(|e| WranglerError::Config(format!("parsing {:?}: {}", path, e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(ColumnSpec::name).collect()
    }

    /// Internal consistency only; page headers are checked by `process::schema`.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(WranglerError::Config("no output columns configured".into()));
        }
        if self.output.dpi == 0 || self.output.width_in <= 0.0 || self.output.height_in <= 0.0 {
            return Err(WranglerError::Config(
                "figure size and dpi must be positive".into(),
            ));
        }

        let mut seen = HashSet::new();
        for name in self.column_names() {
            if !seen.insert(name) {
                return Err(WranglerError::Config(format!(
                    "duplicate output column {:?}",
                    name
                )));
            }
        }

        let known = |c: &str| seen.contains(c);
        if !known(&self.sort_by) {
            return Err(WranglerError::Config(format!(
                "sort column {:?} is not an output column",
                self.sort_by
            )));
        }
        if let Some(ex) = &self.exclude {
            if !known(&ex.column) {
                return Err(WranglerError::Config(format!(
                    "exclusion column {:?} is not an output column",
                    ex.column
                )));
            }
            regex::Regex::new(&ex.pattern).map_err(|e| {
                WranglerError::Config(format!("exclusion pattern {:?}: {}", ex.pattern, e))
            })?;
        }
        for chart in &self.charts {
            if let Some(col) = chart.columns().into_iter().find(|c| !known(c)) {
                return Err(WranglerError::Config(format!(
                    "chart {:?} references unknown column {:?}",
                    chart.file(),
                    col
                )));
            }
            if let ChartSpec::ByCategory { color, file, .. } = chart {
                crate::charts::parse_color(color).ok_or_else(|| {
                    WranglerError::Config(format!("chart {:?}: unknown color {:?}", file, color))
                })?;
            }
            if let ChartSpec::Histogram { bins: 0, file, .. } = chart {
                return Err(WranglerError::Config(format!(
                    "histogram {:?} needs at least one bin",
                    file
                )));
            }
        }
        Ok(())
    }
}
