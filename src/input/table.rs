/// A table as it was read, before any normalization. Cells are `None` when the row didn't have
/// a value for that column at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { headers, rows }
    }

    /// Convenience constructor where every cell is present.
    pub fn from_strings<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|v| Some(v.into())).collect())
                .collect(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column)?.as_deref()
    }
}
