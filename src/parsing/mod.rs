//! Decoding of source workbooks into extraction-ready grids.
//!
//! The only supported source is the first worksheet of an Excel workbook.
//! Decoding flattens every cell to the formatted display string a user
//! would see in the sheet, because the downstream heuristics match on text
//! (`"+"`, `"Auto Kontrol"`, `"Merk"`) rather than on typed values.
//!
//! ## Example
//!
//! ```rust,no_run
//! use antigram_panel::parsing::xlsx;
//! use std::path::Path;
//!
//! let source = xlsx::load(Path::new("data/antigram.xlsx")).unwrap();
//! println!("{}: {} rows", source.sheet_name, source.grid.row_count());
//! ```

pub mod xlsx;
