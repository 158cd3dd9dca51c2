// src/process/mod.rs
pub mod convert;
pub mod raw_table;
pub mod schema;
pub mod stats;
pub mod table;
pub mod utils;

pub use raw_table::RawTable;
pub use table::{build_table, Table};

use crate::error::{Result, WranglerError};
use scraper::{ElementRef, Selector};
use tracing::{debug, info, instrument};

/// Split extracted rows into headers (first row's `<th>` cells) and cleaned
/// data rows (every later row's `<td>` cells).
///
/// Every data row must have exactly as many cells as there are headers; the
/// first that doesn't is reported by its 0-based data-row index.
#[instrument(level = "info", skip(body), fields(rows = body.len()))]
pub fn split_header_and_rows(body: &[ElementRef<'_>]) -> Result<RawTable> {
    let th = Selector::parse("th").expect("static selector should parse");
    let td = Selector::parse("td").expect("static selector should parse");

    let (header, data) = body.split_first().ok_or(WranglerError::EmptyTable)?;

    let headers: Vec<String> = header
        .select(&th)
        .map(|cell| utils::clean_header(&cell.text().collect::<String>()))
        .collect();
    info!(count = headers.len(), "headers for table have been created");

    let mut rows = Vec::with_capacity(data.len());
    for (index, tr) in data.iter().enumerate() {
        let row: Vec<String> = tr
            .select(&td)
            .map(|cell| utils::clean_cell(&cell.text().collect::<String>()))
            .collect();
        if row.len() != headers.len() {
            return Err(WranglerError::MalformedRow {
                index,
                expected: headers.len(),
                found: row.len(),
            });
        }
        debug!(index, first = ?row.first(), "row cleaned");
        rows.push(row);
    }
    info!(count = rows.len(), "data rows have been cleaned and stored");

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::extract_table_rows;
    use scraper::Html;

    fn split(html: &str) -> Result<RawTable> {
        let doc = Html::parse_document(html);
        let body = extract_table_rows(&doc, "wikitable")?;
        split_header_and_rows(&body)
    }

    #[test]
    fn headers_strip_trailing_newline() {
        let raw = split(
            "<table class=\"wikitable\"><tr><th>A</th><th>B\n</th></tr>\
             <tr><td>1</td><td>2</td></tr></table>",
        )
        .unwrap();
        assert_eq!(raw.headers, vec!["A", "B"]);
        assert_eq!(raw.rows, vec![vec!["1", "2"]]);
    }

    #[test]
    fn cells_are_cleaned_in_order() {
        let raw = split(
            "<table class=\"wikitable\"><tr><th>Country</th><th>Deaths\n</th></tr>\
             <tr><td>Germany\n</td><td>3,275&nbsp;\n</td></tr>\
             <tr><td>Malta</td><td>18</td></tr></table>",
        )
        .unwrap();
        assert_eq!(raw.rows[0], vec!["Germany", "3275"]);
        assert_eq!(raw.rows[1], vec!["Malta", "18"]);
        assert_eq!(raw.column_index("Deaths"), Some(1));
    }

    #[test]
    fn header_text_spans_nested_markup() {
        let raw = split(
            "<table class=\"wikitable\"><tr><th>Area\n(thousands of km<sup>2</sup>)<sup>[24]</sup>\n</th></tr>\
             <tr><td>357</td></tr></table>",
        )
        .unwrap();
        assert_eq!(raw.headers, vec!["Area\n(thousands of km2)[24]"]);
    }

    #[test]
    fn short_row_is_malformed() {
        let err = split(
            "<table class=\"wikitable\"><tr><th>A</th><th>B</th></tr>\
             <tr><td>1</td><td>2</td></tr>\
             <tr><td>3</td></tr></table>",
        )
        .unwrap_err();
        match err {
            WranglerError::MalformedRow {
                index,
                expected,
                found,
            } => assert_eq!((index, expected, found), (1, 2, 1)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn long_row_is_malformed() {
        let err = split(
            "<table class=\"wikitable\"><tr><th>A</th></tr>\
             <tr><td>1</td><td>2</td></tr></table>",
        )
        .unwrap_err();
        assert!(matches!(err, WranglerError::MalformedRow { index: 0, .. }));
        assert_eq!(err.stage(), "clean");
    }

    #[test]
    fn no_rows_is_empty_table() {
        let err = split_header_and_rows(&[]).unwrap_err();
        assert!(matches!(err, WranglerError::EmptyTable));
    }
}
