//! Header row location.
//!
//! The header is the row that names the identity column (`Sel`, `Cell`,
//! `No`). Lab templates put a variable number of metadata rows above it, so
//! the locator scans a bounded window from the top of the sheet and takes
//! the first row that names an identity column and looks like a real
//! header rather than a stray word.

use serde::Serialize;

use crate::core::grid::{fold, Grid};

/// Rows scanned from the top of the sheet when hunting for the header.
pub const SCAN_WINDOW: usize = 15;

/// Accepted spellings of the identity column, compared folded and exact.
pub const IDENTITY_SYNONYMS: &[&str] = &["sel", "cell", "no", "no."];

/// Accepted spellings of the reference column, compared folded and exact.
pub const REFERENCE_SYNONYMS: &[&str] = &["ref", "ref.", "reference"];

/// How the header row was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStrategy {
    /// The row names both an identity column and a reference column.
    IdentityWithReference,
    /// The row names an identity column and has at least one other
    /// populated cell.
    IdentityMultiCell,
    /// Nothing in the window qualified; row 0 is used as-is.
    DefaultIndex,
}

impl std::fmt::Display for HeaderStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::IdentityWithReference => "identity with reference",
            Self::IdentityMultiCell => "identity with populated row",
            Self::DefaultIndex => "default to first row",
        };
        write!(f, "{name}")
    }
}

/// The chosen header row and the rule that selected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderLocation {
    pub row: usize,
    pub strategy: HeaderStrategy,
}

/// Scans the top of the grid for the header row.
///
/// The first row inside [`SCAN_WINDOW`] containing an identity synonym
/// wins, provided it is confirmed by either a reference synonym or a
/// second populated cell. A lone identity word in an otherwise empty row
/// is skipped. When no row qualifies, the locator falls back to row 0,
/// which keeps the downstream stages total on arbitrary input: a wrong
/// guess degrades the panel but never errors.
#[must_use]
pub fn locate(grid: &Grid) -> HeaderLocation {
    let window = grid.row_count().min(SCAN_WINDOW);
    for row in 0..window {
        let cells = grid.row(row);
        let has_identity = cells
            .iter()
            .any(|cell| IDENTITY_SYNONYMS.contains(&fold(cell).as_str()));
        if !has_identity {
            continue;
        }
        let has_reference = cells
            .iter()
            .any(|cell| REFERENCE_SYNONYMS.contains(&fold(cell).as_str()));
        if has_reference {
            return HeaderLocation {
                row,
                strategy: HeaderStrategy::IdentityWithReference,
            };
        }
        if grid.populated_count(row) > 1 {
            return HeaderLocation {
                row,
                strategy: HeaderStrategy::IdentityMultiCell,
            };
        }
    }
    HeaderLocation {
        row: 0,
        strategy: HeaderStrategy::DefaultIndex,
    }
}

/// Finds the column whose header label is a reference synonym.
#[must_use]
pub fn reference_column(header: &[String]) -> Option<usize> {
    header
        .iter()
        .position(|cell| REFERENCE_SYNONYMS.contains(&fold(cell).as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_header_with_reference() {
        let grid = Grid::from_rows(vec![
            vec!["Merk", "BioX"],
            vec!["Sel", "Ref", "D", "C"],
        ]);
        let location = locate(&grid);
        assert_eq!(location.row, 1);
        assert_eq!(location.strategy, HeaderStrategy::IdentityWithReference);
    }

    #[test]
    fn test_locate_header_without_reference() {
        let grid = Grid::from_rows(vec![vec!["No.", "Donor", "D", "C", "E"]]);
        let location = locate(&grid);
        assert_eq!(location.row, 0);
        assert_eq!(location.strategy, HeaderStrategy::IdentityMultiCell);
    }

    #[test]
    fn test_lone_identity_word_is_skipped() {
        // A stray "Sel" with nothing beside it is not a header.
        let grid = Grid::from_rows(vec![
            vec!["Sel", "", ""],
            vec!["Sel", "Ref", "D"],
        ]);
        assert_eq!(locate(&grid).row, 1);
    }

    #[test]
    fn test_identity_match_is_exact_after_folding() {
        // "Selection" contains "sel" but does not fold to it.
        let grid = Grid::from_rows(vec![
            vec!["Selection", "Ref", "D"],
            vec!["CELL ", "Ref", "D"],
        ]);
        assert_eq!(locate(&grid).row, 1);
    }

    #[test]
    fn test_first_qualifying_row_wins() {
        let grid = Grid::from_rows(vec![
            vec!["No", "Lot"],
            vec!["Sel", "Ref", "D"],
        ]);
        // Row 0 already qualifies: identity synonym plus a second cell.
        assert_eq!(locate(&grid).row, 0);
        assert_eq!(locate(&grid).strategy, HeaderStrategy::IdentityMultiCell);
    }

    #[test]
    fn test_fallback_to_first_row() {
        let grid = Grid::from_rows(vec![
            vec!["alpha", "beta"],
            vec!["gamma", "delta"],
        ]);
        let location = locate(&grid);
        assert_eq!(location.row, 0);
        assert_eq!(location.strategy, HeaderStrategy::DefaultIndex);
    }

    #[test]
    fn test_scan_window_is_bounded() {
        let mut rows: Vec<Vec<&str>> = (0..SCAN_WINDOW).map(|_| vec!["x", "y"]).collect();
        rows.push(vec!["Sel", "Ref"]);
        // The header sits just past the window, so the locator never sees it.
        let location = locate(&Grid::from_rows(rows));
        assert_eq!(location.row, 0);
        assert_eq!(location.strategy, HeaderStrategy::DefaultIndex);
    }

    #[test]
    fn test_empty_grid() {
        let location = locate(&Grid::new());
        assert_eq!(location.row, 0);
        assert_eq!(location.strategy, HeaderStrategy::DefaultIndex);
    }

    #[test]
    fn test_reference_column() {
        let header = vec!["Sel".to_string(), "Ref.".to_string(), "D".to_string()];
        assert_eq!(reference_column(&header), Some(1));
        let unnamed = vec!["Sel".to_string(), "D".to_string()];
        assert_eq!(reference_column(&unnamed), None);
    }
}
