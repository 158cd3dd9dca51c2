// src/report.rs

use crate::config::ChartSpec;
use crate::error::{Result, WranglerError};
use crate::process::stats::ColumnSummary;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkippedChart {
    pub file: String,
    pub kind: String,
    pub stage: String,
    pub error: String,
}

/// What one run produced and what it had to skip.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub source_url: String,
    pub csv: PathBuf,
    /// Rows written to the CSV.
    pub rows: usize,
    /// Rows left after exclusions; the input of every chart.
    pub charted_rows: usize,
    pub produced: Vec<PathBuf>,
    pub skipped: Vec<SkippedChart>,
    pub stats: Vec<ColumnSummary>,
}

impl RunSummary {
    pub fn new(source_url: &str, csv: PathBuf, rows: usize, charted_rows: usize) -> Self {
        Self {
            generated_at: Utc::now(),
            source_url: source_url.to_string(),
            csv,
            rows,
            charted_rows,
            produced: Vec::new(),
            skipped: Vec::new(),
            stats: Vec::new(),
        }
    }

    pub fn record(&mut self, spec: &ChartSpec, result: Result<PathBuf>) {
        match result {
            Ok(path) => self.produced.push(path),
            Err(e) => self.skipped.push(SkippedChart {
                file: spec.file().to_string(),
                kind: spec.kind().to_string(),
                stage: e.stage().to_string(),
                error: e.to_string(),
            }),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn log(&self) {
        info!(
            csv = %self.csv.display(),
            rows = self.rows,
            charted_rows = self.charted_rows,
            produced = self.produced.len(),
            skipped = self.skipped.len(),
            "run finished"
        );
        for s in &self.skipped {
            warn!(file = %s.file, stage = %s.stage, error = %s.error, "chart not produced");
        }
    }

    /// Pretty JSON with a trailing newline.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let summary_err = |reason: String| WranglerError::SummaryWrite {
            path: path.to_path_buf(),
            reason,
        };
        let mut json = serde_json::to_string_pretty(self).map_err(|e| summary_err(e.to_string()))?;
        json.push('\n');
        fs::write(path, json).map_err(|e| summary_err(e.to_string()))
    }
}
