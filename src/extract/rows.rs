//! Row classification below the header.
//!
//! Data rows follow the header until the first fully blank row, which acts
//! as the end-of-table sentinel (print templates keep notes and signature
//! blocks further down the sheet). Along the way one row may be the
//! patient auto control, marked by the word "auto" anywhere in the row; it
//! feeds the [`AutoControl`] record instead of the reagent cell list.

use crate::core::grid::{fold, Grid};
use crate::core::panel::{AutoControl, PanelCell};
use crate::extract::antigens::AntigenColumn;

/// Substring marking the auto-control row. Covers `Auto`, `Auto Kontrol`,
/// and `auto control` in any casing.
pub const AUTO_MARKER: &str = "auto";

/// An auto-control row needs this many populated result cells before its
/// named phase columns are trusted over trailing position. Sparse rows
/// under merged print cells shift left of their header names.
const NAMED_PHASE_MIN_RESULTS: usize = 4;

/// The classified rows below one header.
#[derive(Debug, Clone, Default)]
pub struct RowScan {
    pub cells: Vec<PanelCell>,
    pub auto: AutoControl,
    /// Grid row recognized as the auto control, if any.
    pub auto_row: Option<usize>,
}

/// Walks the rows below `header_row`, splitting reagent cells from the
/// auto control.
///
/// The walk stops at the first fully blank row. Only the first
/// auto-control row is honored; later ones are dropped entirely rather
/// than demoted to data rows.
#[must_use]
pub fn classify(grid: &Grid, header_row: usize, antigens: &[AntigenColumn]) -> RowScan {
    let mut scan = RowScan::default();
    for row in header_row + 1..grid.row_count() {
        if grid.row_is_blank(row) {
            break;
        }
        if let Some(marker_col) = auto_marker_column(grid.row(row)) {
            if scan.auto_row.is_none() {
                scan.auto_row = Some(row);
                scan.auto = extract_auto(grid, grid.row(header_row), row, marker_col);
            }
            continue;
        }
        scan.cells.push(data_cell(grid, row, antigens));
    }
    scan
}

/// Finds the first cell whose folded text contains the auto marker.
fn auto_marker_column(cells: &[String]) -> Option<usize> {
    cells
        .iter()
        .position(|cell| fold(cell).contains(AUTO_MARKER))
}

/// Builds an ordinary reagent cell row. Every antigen label gets an entry,
/// empty when its column is blank or past the end of the row.
fn data_cell(grid: &Grid, row: usize, antigens: &[AntigenColumn]) -> PanelCell {
    let antigen = antigens
        .iter()
        .map(|antigen| {
            let value = grid.cell(row, antigen.column).trim().to_string();
            (antigen.label.clone(), value)
        })
        .collect();
    PanelCell {
        sel: grid.cell(row, 0).trim().to_string(),
        reference: grid.cell(row, 1).trim().to_string(),
        antigen,
        is_auto: false,
    }
}

/// Reads the four phase results out of the auto-control row.
///
/// The baseline is positional: the populated cells after dropping the
/// marker cell are taken from the end, 4th-from-last through last mapping
/// to 20°C, 37°C, IAT, Gel. When the row carries at least
/// [`NAMED_PHASE_MIN_RESULTS`] results, header columns named `20`, `37`,
/// `iat`, or `gel` override the positional read wherever they hold text.
fn extract_auto(grid: &Grid, header: &[String], row: usize, marker_col: usize) -> AutoControl {
    let results: Vec<&str> = grid
        .row(row)
        .iter()
        .enumerate()
        .filter(|(col, cell)| *col != marker_col && !cell.trim().is_empty())
        .map(|(_, cell)| cell.trim())
        .collect();

    let from_end = |n: usize| {
        results
            .len()
            .checked_sub(n)
            .map_or_else(String::new, |i| results[i].to_string())
    };

    let mut auto = AutoControl {
        phase_20c: from_end(4),
        phase_37c: from_end(3),
        iat: from_end(2),
        gel: from_end(1),
    };

    if results.len() >= NAMED_PHASE_MIN_RESULTS {
        let named = |marker: &str| {
            header
                .iter()
                .position(|cell| fold(cell).contains(marker))
                .map(|col| grid.cell(row, col).trim().to_string())
                .filter(|value| !value.is_empty())
        };
        if let Some(value) = named("20") {
            auto.phase_20c = value;
        }
        if let Some(value) = named("37") {
            auto.phase_37c = value;
        }
        if let Some(value) = named("iat") {
            auto.iat = value;
        }
        if let Some(value) = named("gel") {
            auto.gel = value;
        }
    }

    auto
}
