//! Reading the source workbook.
//!
//! [`load`] opens the workbook fresh on every call and never caches: an
//! upload may replace the file between calls, and serving a stale panel is
//! worse than paying the re-read. Callers own whatever locking keeps a
//! read from observing a half-written file.

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use thiserror::Error;

use crate::core::grid::Grid;

/// Errors raised while decoding the source workbook.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The backing file does not exist at read time.
    #[error("source file not found: {0}")]
    Missing(String),
    /// The file exists but cannot be parsed as a workbook.
    #[error("failed to decode workbook: {0}")]
    Decode(#[from] calamine::XlsxError),
    /// The workbook decoded but contains no sheets.
    #[error("workbook has no sheets")]
    EmptyWorkbook,
}

/// The decoded first sheet of a workbook.
#[derive(Debug, Clone)]
pub struct SourceSheet {
    pub grid: Grid,
    pub sheet_name: String,
}

/// Reads the first sheet of the workbook at `path` into a [`Grid`].
///
/// # Errors
///
/// Returns [`SourceError::Missing`] when the file does not exist,
/// [`SourceError::Decode`] when it cannot be parsed as a workbook, and
/// [`SourceError::EmptyWorkbook`] when it holds no sheets.
pub fn load(path: &Path) -> Result<SourceSheet, SourceError> {
    if !path.exists() {
        return Err(SourceError::Missing(path.display().to_string()));
    }
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SourceError::EmptyWorkbook)?;
    let range = workbook.worksheet_range(&sheet_name)?;
    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());
    Ok(SourceSheet {
        grid: Grid::from_rows(rows),
        sheet_name,
    })
}

/// Converts one cell to the display text a user would see in the sheet.
///
/// Integral floats lose the trailing `.0` (`88`, never `"88.0"`), dates
/// render as ISO text, and error cells become empty rather than leaking
/// `#DIV/0!` into the panel.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(text) => text.clone(),
        Data::Bool(value) => {
            if *value {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        Data::Int(value) => value.to_string(),
        Data::Float(value) => float_to_string(*value),
        Data::DateTime(value) => value.as_datetime().map_or_else(
            || value.as_f64().to_string(),
            |datetime| {
                if datetime.time() == chrono::NaiveTime::MIN {
                    datetime.format("%Y-%m-%d").to_string()
                } else {
                    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            },
        ),
        Data::DateTimeIso(text) | Data::DurationIso(text) => text.clone(),
    }
}

/// Formats a float the way the sheet displays it.
fn float_to_string(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
