/// Header row plus cleaned data rows, positionally aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    /// Column names as the page spells them, trailing newlines stripped.
    pub headers: Vec<String>,
    /// Each data row, one cleaned string per header.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }
}
