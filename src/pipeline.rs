// src/pipeline.rs

use crate::charts::{self, font, Canvas};
use crate::config::Config;
use crate::error::{Result, WranglerError};
use crate::fetch;
use crate::process::{self, stats, Table};
use crate::report::RunSummary;
use regex::Regex;
use scraper::Html;
use tracing::{info, instrument};

/// Fetch the configured page and run every stage on it.
pub fn run(config: &Config) -> Result<RunSummary> {
    let client = fetch::build_client(config.source.timeout_secs)?;
    let html = fetch::fetch_page(&client, &config.source.url)?;
    run_with_html(config, &html)
}

/// Every stage after the fetch: extract, clean, build + CSV, charts, summary.
#[instrument(level = "info", skip_all, fields(url = %config.source.url))]
pub fn run_with_html(config: &Config, html: &str) -> Result<RunSummary> {
    let out = &config.output;
    charts::ensure_dir(&out.dir)?;

    let table = {
        let doc = Html::parse_document(html);
        let body = fetch::extract_table_rows(&doc, &config.source.table_class)?;
        let raw = process::split_header_and_rows(&body)?;
        process::build_table(&raw, config)?
    };

    let charted = chart_input(&table, config)?;
    let mut summary = RunSummary::new(
        &config.source.url,
        out.csv_path(),
        table.len(),
        charted.len(),
    );

    summary.stats = stats::describe(&charted);
    for s in &summary.stats {
        info!(
            column = %s.column,
            count = s.count,
            mean = s.mean,
            std = s.std,
            min = s.min,
            median = s.median,
            max = s.max,
            "describe"
        );
    }

    if !config.charts.is_empty() {
        let status = charts::ensure_dir(&out.charts_path())?;
        info!(dir = %out.charts_path().display(), ?status, "charts directory ready");

        let annotate = out.annotate && font::ensure_font(out.font.as_deref());
        let canvas = Canvas::from_output(out, annotate);
        for (spec, result) in charts::render_all(&charted, &config.charts, &canvas) {
            summary.record(spec, result);
        }
    }

    summary.write(out.summary_path())?;
    summary.log();
    Ok(summary)
}

/// The table every chart sees: the CSV table minus excluded rows.
pub fn chart_input(table: &Table, config: &Config) -> Result<Table> {
    match &config.exclude {
        Some(ex) => {
            let re = Regex::new(&ex.pattern).map_err(|e| {
                WranglerError::Config(format!("exclusion pattern {:?}: {}", ex.pattern, e))
            })?;
            table.without_matching(&ex.column, &re)
        }
        None => Ok(table.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExcludeRows, COUNTRY};

    fn table() -> Table {
        Table::new(
            vec![COUNTRY.into(), "v".into()],
            vec![
                vec!["Austria".into(), "1".into()],
                vec!["EU".into(), "2".into()],
                vec!["European Union".into(), "3".into()],
                vec!["Europe-ish".into(), "4".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn default_exclusion_targets_aggregate_rows() {
        let cfg = Config::default();
        let charted = chart_input(&table(), &cfg).unwrap();
        assert_eq!(
            charted.column(COUNTRY).unwrap(),
            vec!["Austria", "Europe-ish"]
        );
    }

    #[test]
    fn no_exclusion_keeps_everything() {
        let mut cfg = Config::default();
        cfg.exclude = None;
        assert_eq!(chart_input(&table(), &cfg).unwrap(), table());
    }

    #[test]
    fn bad_pattern_is_config_error() {
        let mut cfg = Config::default();
        cfg.exclude = Some(ExcludeRows {
            column: COUNTRY.into(),
            pattern: "(".into(),
        });
        assert_eq!(chart_input(&table(), &cfg).unwrap_err().stage(), "config");
    }
}
