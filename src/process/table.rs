// src/process/table.rs

use crate::config::Config;
use crate::error::{Result, WranglerError};
use crate::process::{convert, schema, RawTable};
use csv::{ReaderBuilder, WriterBuilder};
use regex::Regex;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Named-column table of cleaned strings. Rows are always as wide as `columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != columns.len())
        {
            return Err(WranglerError::MalformedRow {
                index,
                expected: columns.len(),
                found: row.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| WranglerError::SchemaMismatch {
                missing: vec![name.to_string()],
                extra: Vec::new(),
            })
    }

    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let i = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| r[i].as_str()).collect())
    }

    /// Stable ascending sort on the numeric reading of `name`.
    pub fn sort_by_numeric(&mut self, name: &str) -> Result<()> {
        let keys = convert::numeric_column(self, name)?;
        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));

        let mut old: Vec<Option<Vec<String>>> = self.rows.drain(..).map(Some).collect();
        self.rows = order.into_iter().filter_map(|i| old[i].take()).collect();
        Ok(())
    }

    /// Copy of the table without the rows whose `column` matches `pattern`.
    pub fn without_matching(&self, column: &str, pattern: &Regex) -> Result<Table> {
        let i = self.column_index(column)?;
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .filter(|r| !pattern.is_match(&r[i]))
            .cloned()
            .collect();
        debug!(
            column,
            removed = self.rows.len() - rows.len(),
            "excluded matching rows"
        );
        Ok(Table {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Header row plus every data row; no index column.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let csv_err = |source| WranglerError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut w = WriterBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(csv_err)?;
        w.write_record(&self.columns).map_err(csv_err)?;
        for row in &self.rows {
            w.write_record(row).map_err(csv_err)?;
        }
        w.flush().map_err(|e| csv_err(e.into()))?;
        Ok(())
    }

    /// Read a CSV written by [`Table::write_csv`], every cell as text.
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
        let path = path.as_ref();
        let csv_err = |source| WranglerError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(csv_err)?;
        let columns: Vec<String> = rdr
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(str::to_string)
            .collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(csv_err)?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Table::new(columns, rows)
    }
}

/// Map the cleaned page table onto the configured columns, sort it and
/// persist it to the configured CSV path.
#[instrument(level = "info", skip_all, fields(rows = raw.rows.len()))]
pub fn build_table(raw: &RawTable, config: &Config) -> Result<Table> {
    let plan = schema::plan(&raw.headers, config)?;
    if let Some((index, row)) = raw
        .rows
        .iter()
        .enumerate()
        .find(|(_, r)| r.len() != raw.headers.len())
    {
        return Err(WranglerError::MalformedRow {
            index,
            expected: raw.headers.len(),
            found: row.len(),
        });
    }
    let rows = raw.rows.iter().map(|r| plan.project(r)).collect();
    let mut table = Table::new(plan.names(), rows)?;
    info!(
        columns = table.columns().len(),
        "table created with the relevant columns"
    );

    table.sort_by_numeric(&config.sort_by)?;
    info!(by = %config.sort_by, "table sorted");

    let path = config.output.csv_path();
    table.write_csv(&path)?;
    info!(path = %path.display(), rows = table.len(), "table saved as CSV");

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Table {
        Table::new(
            vec!["Country".into(), "Rate".into()],
            vec![
                vec!["Sweden".into(), "32".into()],
                vec!["Romania".into(), "96".into()],
                vec!["EU".into(), "49".into()],
                vec!["Malta".into(), "9".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn sort_is_numeric_not_lexical() {
        let mut t = sample();
        t.sort_by_numeric("Rate").unwrap();
        assert_eq!(t.column("Rate").unwrap(), vec!["9", "32", "49", "96"]);
        assert_eq!(t.column("Country").unwrap()[0], "Malta");
    }

    #[test]
    fn sort_keeps_ties_in_input_order() {
        let mut t = Table::new(
            vec!["k".into(), "v".into()],
            vec![
                vec!["a".into(), "2".into()],
                vec!["b".into(), "1".into()],
                vec!["c".into(), "2".into()],
            ],
        )
        .unwrap();
        t.sort_by_numeric("v").unwrap();
        assert_eq!(t.column("k").unwrap(), vec!["b", "a", "c"]);
    }

    #[test]
    fn sort_on_text_names_the_cell() {
        let mut t = sample();
        match t.sort_by_numeric("Country").unwrap_err() {
            WranglerError::Conversion { column, row, value } => {
                assert_eq!((column.as_str(), row, value.as_str()), ("Country", 0, "Sweden"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn exclusion_leaves_source_table_untouched() {
        let t = sample();
        let re = Regex::new("^EU$").unwrap();
        let charted = t.without_matching("Country", &re).unwrap();
        assert_eq!(charted.len(), 3);
        assert!(!charted.column("Country").unwrap().contains(&"EU"));
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Table::new(vec!["a".into()], vec![vec![], vec!["x".into()]]).unwrap_err();
        assert!(matches!(err, WranglerError::MalformedRow { index: 0, .. }));
    }

    #[test]
    fn csv_round_trip_preserves_cells_and_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let t = Table::new(
            vec!["Country".into(), "Note".into()],
            vec![
                vec!["Czech Republic".into(), "has, comma".into()],
                vec!["Ireland".into(), "\"quoted\"".into()],
            ],
        )
        .unwrap();
        t.write_csv(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().next(), Some("Country,Note"));

        let back = Table::read_csv(&path).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn ragged_raw_table_is_malformed_not_a_panic() {
        let tmp = tempdir().unwrap();
        let mut cfg = Config::default();
        cfg.output.dir = tmp.path().to_path_buf();
        let headers: Vec<String> = cfg
            .columns
            .iter()
            .filter_map(|c| c.source())
            .chain(cfg.drop.iter().map(String::as_str))
            .map(str::to_string)
            .collect();
        let full = vec!["1".to_string(); headers.len()];
        let short = vec!["1".to_string(); 2];
        let raw = RawTable {
            headers: headers.clone(),
            rows: vec![full, short],
        };

        match build_table(&raw, &cfg).unwrap_err() {
            WranglerError::MalformedRow {
                index,
                expected,
                found,
            } => {
                assert_eq!(index, 1);
                assert_eq!(expected, headers.len());
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(!cfg.output.csv_path().exists());
    }

    #[test]
    fn write_into_missing_dir_is_output_error() {
        let dir = tempdir().unwrap();
        let err = sample()
            .write_csv(dir.path().join("nope").join("t.csv"))
            .unwrap_err();
        assert_eq!(err.stage(), "output");
    }
}
