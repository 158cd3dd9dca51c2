use crate::error::{Result, WranglerError};
use crate::process::{utils, Table};

/// Every cell of `name` as `f64`, or the first cell that isn't numeric.
pub fn numeric_column(table: &Table, name: &str) -> Result<Vec<f64>> {
    table
        .column(name)?
        .into_iter()
        .enumerate()
        .map(|(row, cell)| {
            utils::parse_number(cell).ok_or_else(|| WranglerError::Conversion {
                column: name.to_string(),
                row,
                value: cell.to_string(),
            })
        })
        .collect()
}

/// Paired numeric reading of two columns, row-aligned.
pub fn numeric_pairs(table: &Table, x: &str, y: &str) -> Result<Vec<(f64, f64)>> {
    let xs = numeric_column(table, x)?;
    let ys = numeric_column(table, y)?;
    Ok(xs.into_iter().zip(ys).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new(
            vec!["Country".into(), "Area".into(), "Deaths".into()],
            vec![
                vec!["Austria".into(), "84".into(), "409".into()],
                vec!["Belgium".into(), "31".into(), "604[b]".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn coerces_whole_column() {
        assert_eq!(numeric_column(&table(), "Area").unwrap(), vec![84.0, 31.0]);
    }

    #[test]
    fn footnote_marker_fails_with_cell_position() {
        match numeric_column(&table(), "Deaths").unwrap_err() {
            WranglerError::Conversion { column, row, value } => {
                assert_eq!(column, "Deaths");
                assert_eq!(row, 1);
                assert_eq!(value, "604[b]");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unknown_column_is_schema_mismatch() {
        let err = numeric_column(&table(), "GDP").unwrap_err();
        assert!(matches!(err, WranglerError::SchemaMismatch { .. }));
    }

    #[test]
    fn pairs_stay_aligned() {
        let t = Table::new(
            vec!["x".into(), "y".into()],
            vec![
                vec!["1".into(), "10".into()],
                vec!["2".into(), "20".into()],
            ],
        )
        .unwrap();
        assert_eq!(
            numeric_pairs(&t, "x", "y").unwrap(),
            vec![(1.0, 10.0), (2.0, 20.0)]
        );
    }
}
