use crate::config::{ColumnSpec, Config};
use crate::error::{Result, WranglerError};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Where one output column's values come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSource {
    /// Position in the page's header row.
    Header(usize),
    Constant(String),
}

/// Output columns resolved against a concrete header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaPlan {
    pub columns: Vec<(String, ColumnSource)>,
}

impl SchemaPlan {
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Project one cleaned data row into output order.
    pub fn project(&self, row: &[String]) -> Vec<String> {
        self.columns
            .iter()
            .map(|(_, src)| match src {
                ColumnSource::Header(i) => row[*i].clone(),
                ColumnSource::Constant(v) => v.clone(),
            })
            .collect()
    }
}

/// Check the page headers against the configured mapping and drop list.
///
/// Every mapped or dropped name must appear in `headers` exactly as spelled,
/// and every header must be either mapped or dropped. All offenders are
/// reported together.
#[instrument(level = "debug", skip_all, fields(headers = headers.len()))]
pub fn plan(headers: &[String], config: &Config) -> Result<SchemaPlan> {
    let mut missing = Vec::new();
    let mut columns = Vec::with_capacity(config.columns.len());
    for spec in &config.columns {
        let src = match spec {
            ColumnSpec::Mapped { source, .. } => match headers.iter().position(|h| h == source) {
                Some(i) => ColumnSource::Header(i),
                None => {
                    missing.push(source.clone());
                    continue;
                }
            },
            ColumnSpec::Constant { constant, .. } => ColumnSource::Constant(constant.clone()),
        };
        columns.push((spec.name().to_string(), src));
    }

    let present: HashSet<&str> = headers.iter().map(String::as_str).collect();
    missing.extend(
        config
            .drop
            .iter()
            .filter(|name| !present.contains(name.as_str()))
            .cloned(),
    );

    let expected: HashSet<&str> = config
        .columns
        .iter()
        .filter_map(ColumnSpec::source)
        .chain(config.drop.iter().map(String::as_str))
        .collect();
    let extra: Vec<String> = headers
        .iter()
        .filter(|h| !expected.contains(h.as_str()))
        .cloned()
        .collect();

    if !missing.is_empty() || !extra.is_empty() {
        return Err(WranglerError::SchemaMismatch { missing, extra });
    }

    let plan = SchemaPlan { columns };
    debug!(columns = ?plan.names(), "schema plan resolved");
    Ok(plan)
}
