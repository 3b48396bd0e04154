//! Metadata scan above the header row.
//!
//! Rows above the header carry free-form label/value pairs laid out
//! horizontally. Matching is substring based so `"Merk / Brand"` and
//! `"No. Lot:"` both hit, and the value is read from the cell immediately
//! to the right of the label. Templates mix Indonesian and English
//! spellings, hence `kedaluwarsa` next to `exp`.

use crate::core::grid::{fold, Grid};
use crate::core::panel::PanelMeta;

/// Scans every row above `header_row` for brand, lot, and expiry labels.
///
/// The scan runs top to bottom and left to right; a later match overwrites
/// an earlier one, so a template that repeats a label keeps the value
/// closest to the header. A label in the last populated cell of its row
/// yields an empty value.
#[must_use]
pub fn scan(grid: &Grid, header_row: usize) -> PanelMeta {
    let mut meta = PanelMeta::default();
    for row in 0..header_row {
        for (col, cell) in grid.row(row).iter().enumerate() {
            let label = fold(cell);
            let value = grid.cell(row, col + 1).trim();
            if label.contains("merk") {
                meta.brand = value.to_string();
            }
            if label.contains("lot") {
                meta.lot = value.to_string();
            }
            if label.contains("exp") || label.contains("kedaluwarsa") {
                meta.expiry = value.to_string();
            }
        }
    }
    meta
}
