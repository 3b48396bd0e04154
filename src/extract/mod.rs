//! Heuristic extraction of a structured panel from a worksheet grid.
//!
//! Antigram worksheets are formatted for printing, not for machines: the
//! header row floats below a variable block of metadata, antigen columns
//! sit between identity columns and test-phase columns, and the auto
//! control hides as an ordinary-looking row. Extraction runs four ordered
//! stages over the [`Grid`](crate::core::grid::Grid) snapshot:
//!
//! 1. **Header location** ([`header`]): find the row naming the identity
//!    column, scanning a bounded window from the top.
//! 2. **Metadata scan** ([`meta`]): harvest brand/lot/expiry pairs from
//!    the rows above the header.
//! 3. **Antigen resolution** ([`antigens`]): decide which header labels
//!    are antigen columns and which column each label reads from.
//! 4. **Row classification** ([`rows`]): walk the rows below the header,
//!    separating reagent cells from the auto control and stopping at the
//!    first blank row.
//!
//! Every stage degrades instead of failing: a grid that matches nothing
//! still produces a well-typed (if empty) panel. Each stage records what
//! it decided in an [`ExtractionTrace`] so the `inspect` command can show
//! why a workbook parsed the way it did.
//!
//! ## Example
//!
//! ```rust
//! use antigram_panel::core::grid::Grid;
//! use antigram_panel::extract::extract;
//!
//! let grid = Grid::from_rows(vec![
//!     vec!["Merk", "BioX"],
//!     vec!["Sel", "Ref", "D", "C", "iat", "gel"],
//!     vec!["1", "R1", "+", "-", "+", "-"],
//! ]);
//! let extraction = extract(&grid, "Sheet1");
//! assert_eq!(extraction.panel.meta.brand, "BioX");
//! assert_eq!(extraction.panel.cells[0].antigen["D"], "+");
//! ```

pub mod antigens;
pub mod header;
pub mod meta;
pub mod rows;

pub use antigens::{AntigenColumn, AntigenSet, AntigenStrategy};
pub use header::{HeaderLocation, HeaderStrategy};

use serde::Serialize;
use tracing::debug;

use crate::core::grid::Grid;
use crate::core::panel::Panel;

/// A finished extraction: the panel itself plus the decisions behind it.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub panel: Panel,
    pub trace: ExtractionTrace,
}

/// Where each heuristic landed for one workbook.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionTrace {
    /// Zero-based index of the row used as the header.
    pub header_row: usize,
    pub header_strategy: HeaderStrategy,
    pub antigen_strategy: AntigenStrategy,
    /// Resolved antigen labels with their source columns, in sheet order.
    pub antigen_columns: Vec<AntigenColumn>,
    /// Grid row recognized as the auto control, if any.
    pub auto_row: Option<usize>,
    /// Reagent cell rows consumed before the terminating blank row.
    pub data_rows: usize,
}

/// Runs the full extraction pipeline over a grid.
#[must_use]
pub fn extract(grid: &Grid, sheet_name: &str) -> Extraction {
    let location = header::locate(grid);
    let header: Vec<String> = grid
        .row(location.row)
        .iter()
        .map(|cell| cell.trim().to_string())
        .collect();

    let meta = meta::scan(grid, location.row);
    let antigens = antigens::resolve(&header);
    let scan = rows::classify(grid, location.row, &antigens.columns);
    let data_rows = scan.cells.len();

    debug!(
        header_row = location.row,
        header_strategy = %location.strategy,
        antigen_strategy = %antigens.strategy,
        antigens = antigens.columns.len(),
        cells = data_rows,
        auto = scan.auto_row.is_some(),
        "extracted panel"
    );

    Extraction {
        panel: Panel::new(header, meta, scan.cells, scan.auto, sheet_name),
        trace: ExtractionTrace {
            header_row: location.row,
            header_strategy: location.strategy,
            antigen_strategy: antigens.strategy,
            antigen_columns: antigens.columns,
            auto_row: scan.auto_row,
            data_rows,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_end_to_end() {
        let grid = Grid::from_rows(vec![
            vec!["Merk", "BioX"],
            vec!["Lot", "88"],
            vec!["Sel", "Ref", "D", "C", "20c", "37c", "iat", "gel"],
            vec!["1", "R1", "+", "-", "", "", "+", "-"],
            vec!["Auto Kontrol", "", "", "", "", "+", "", "-"],
        ]);
        let extraction = extract(&grid, "Sheet1");
        let panel = &extraction.panel;

        assert!(panel.ok);
        assert_eq!(extraction.trace.header_row, 2);
        assert_eq!(panel.meta.brand, "BioX");
        assert_eq!(panel.meta.lot, "88");
        assert_eq!(panel.meta.expiry, "");

        let labels: Vec<&str> = extraction
            .trace
            .antigen_columns
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(labels, vec!["D", "C"]);

        assert_eq!(panel.cells.len(), 1);
        assert_eq!(panel.cells[0].sel, "1");
        assert_eq!(panel.cells[0].reference, "R1");
        assert_eq!(panel.cells[0].antigen["D"], "+");
        assert_eq!(panel.cells[0].antigen["C"], "-");
        assert!(!panel.cells[0].is_auto);

        assert_eq!(panel.auto.phase_20c, "");
        assert_eq!(panel.auto.phase_37c, "");
        assert_eq!(panel.auto.iat, "+");
        assert_eq!(panel.auto.gel, "-");
        assert_eq!(panel.source_sheet_name, "Sheet1");
    }

    #[test]
    fn test_trace_counts_data_rows() {
        let grid = Grid::from_rows(vec![
            vec!["Sel", "Ref", "D", "iat"],
            vec!["1", "R1", "+", "-"],
            vec!["2", "R2", "-", "+"],
            vec!["Auto", "", "", "-"],
            vec!["3", "R3", "+", "+"],
        ]);
        let extraction = extract(&grid, "Sheet1");
        assert_eq!(extraction.panel.cells.len(), 3);
        assert_eq!(extraction.trace.data_rows, extraction.panel.cells.len());
        assert_eq!(extraction.trace.auto_row, Some(3));
    }

    #[test]
    fn test_extract_blank_row_after_header() {
        let grid = Grid::from_rows(vec![
            vec!["Sel", "Ref", "D"],
            vec!["", "", ""],
            vec!["1", "R1", "+"],
        ]);
        let extraction = extract(&grid, "Sheet1");
        assert!(extraction.panel.ok);
        assert!(extraction.panel.cells.is_empty());
        assert!(extraction.panel.auto.is_empty());
    }

    #[test]
    fn test_extract_header_is_trimmed() {
        let grid = Grid::from_rows(vec![vec![" Sel ", "Ref", " D"]]);
        let extraction = extract(&grid, "Sheet1");
        assert_eq!(extraction.panel.header, vec!["Sel", "Ref", "D"]);
    }

    #[test]
    fn test_extract_empty_grid() {
        let extraction = extract(&Grid::new(), "Sheet1");
        let panel = &extraction.panel;
        assert!(panel.ok);
        assert!(panel.header.is_empty());
        assert!(panel.cells.is_empty());
        assert!(panel.auto.is_empty());
        assert_eq!(panel.meta, crate::core::panel::PanelMeta::default());
    }

    #[test]
    fn test_extract_is_deterministic() {
        let grid = Grid::from_rows(vec![
            vec!["Sel", "Ref", "D", "C", "E", "c", "e", "iat"],
            vec!["1", "R1", "+", "-", "+", "-", "+", "2+"],
        ]);
        let first = serde_json::to_string(&extract(&grid, "Sheet1").panel).unwrap();
        let second = serde_json::to_string(&extract(&grid, "Sheet1").panel).unwrap();
        assert_eq!(first, second);
    }
}
