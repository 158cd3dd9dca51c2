use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WranglerError {
    #[error("GET {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("no <table class=\"{class}\"> found on page")]
    Extraction { class: String },

    #[error("table has no header row")]
    EmptyTable,

    #[error("data row {index} has {found} cells, header row has {expected}")]
    MalformedRow {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("column mapping does not match page headers (missing: {missing:?}, unexpected: {extra:?})")]
    SchemaMismatch {
        missing: Vec<String>,
        extra: Vec<String>,
    },

    #[error("column {column:?} row {row}: {value:?} is not numeric")]
    Conversion {
        column: String,
        row: usize,
        value: String,
    },

    #[error("writing {path:?}: {reason}")]
    ChartWrite { path: PathBuf, reason: String },

    #[error("preparing output directory {path:?}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("writing run summary {path:?}: {reason}")]
    SummaryWrite { path: PathBuf, reason: String },

    #[error("CSV {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WranglerError {
    /// Pipeline stage the error came from, used in diagnostics and the run summary.
    pub fn stage(&self) -> &'static str {
        match self {
            WranglerError::Fetch { .. } => "fetch",
            WranglerError::Extraction { .. } | WranglerError::EmptyTable => "extract",
            WranglerError::MalformedRow { .. } => "clean",
            WranglerError::SchemaMismatch { .. } => "build",
            WranglerError::Conversion { .. } => "convert",
            WranglerError::ChartWrite { .. } => "render",
            WranglerError::OutputDir { .. }
            | WranglerError::SummaryWrite { .. }
            | WranglerError::Csv { .. } => "output",
            WranglerError::Config(_) => "config",
        }
    }
}

pub type Result<T> = std::result::Result<T, WranglerError>;
