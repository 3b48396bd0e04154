//! Worksheet grid snapshot and cell folding helpers.
//!
//! Extraction never touches the workbook directly: the decode step flattens
//! the first sheet into a [`Grid`] of display strings, and every heuristic
//! downstream works on that snapshot. Out-of-range access yields empty
//! values rather than panicking, mirroring how a spreadsheet treats blank
//! space beyond the used range.

/// A rectangular snapshot of one worksheet.
///
/// Rows hold formatted display strings exactly as a user would see them in
/// the sheet. Rows may be ragged; [`Grid::cell`] treats any missing
/// coordinate as an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Builds a grid from row-major cell text.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Number of rows in the used range.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the cells of row `index`, or an empty slice past the used
    /// range.
    #[must_use]
    pub fn row(&self, index: usize) -> &[String] {
        self.rows.get(index).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the text of a single cell, or `""` when the coordinate is
    /// outside the used range.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map_or("", String::as_str)
    }

    /// True when every cell of the row is empty or whitespace. Rows past
    /// the used range are blank by definition.
    #[must_use]
    pub fn row_is_blank(&self, index: usize) -> bool {
        self.row(index).iter().all(|cell| cell.trim().is_empty())
    }

    /// Number of populated (non-whitespace) cells in a row.
    #[must_use]
    pub fn populated_count(&self, index: usize) -> usize {
        self.row(index)
            .iter()
            .filter(|cell| !cell.trim().is_empty())
            .count()
    }
}

/// Folds a cell for keyword matching: surrounding whitespace dropped,
/// everything lowercased.
#[must_use]
pub fn fold(cell: &str) -> String {
    cell.trim().to_lowercase()
}

/// Folds a cell into a header lookup key: [`fold`] plus trailing ASCII
/// punctuation stripped, so `"Ref."` and `"ref"` collide.
#[must_use]
pub fn fold_key(cell: &str) -> String {
    fold(cell)
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_out_of_range_is_empty() {
        let grid = Grid::from_rows(vec![vec!["a", "b"]]);
        assert_eq!(grid.cell(0, 0), "a");
        assert_eq!(grid.cell(0, 5), "");
        assert_eq!(grid.cell(3, 0), "");
    }

    #[test]
    fn test_ragged_rows() {
        let grid = Grid::from_rows(vec![vec!["a"], vec!["b", "c", "d"]]);
        assert_eq!(grid.row(0).len(), 1);
        assert_eq!(grid.cell(1, 2), "d");
        assert_eq!(grid.cell(0, 2), "");
    }

    #[test]
    fn test_row_is_blank() {
        let grid = Grid::from_rows(vec![vec!["", "  ", "\t"], vec!["", "x"]]);
        assert!(grid.row_is_blank(0));
        assert!(!grid.row_is_blank(1));
        assert!(grid.row_is_blank(9), "rows past the used range are blank");
    }

    #[test]
    fn test_populated_count() {
        let grid = Grid::from_rows(vec![vec!["a", "", " ", "b"]]);
        assert_eq!(grid.populated_count(0), 2);
        assert_eq!(grid.populated_count(1), 0);
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold("  Sel "), "sel");
        assert_eq!(fold("REF."), "ref.");
        assert_eq!(fold(""), "");
    }

    #[test]
    fn test_fold_key_strips_trailing_punctuation() {
        assert_eq!(fold_key("Ref."), "ref");
        assert_eq!(fold_key("No."), "no");
        assert_eq!(fold_key(" Fya "), "fya");
        // Leading punctuation stays part of the key.
        assert_eq!(fold_key("+D"), "+d");
    }
}
