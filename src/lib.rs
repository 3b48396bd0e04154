//! # antigram-panel
//!
//! A library for extracting structured antigram panels from laboratory spreadsheets.
//!
//! Blood bank antibody identification uses a reference panel of reagent red
//! cells, and vendors ship the lot-specific antigen table as a printable
//! worksheet rather than as data. The layout drifts between vendors and even
//! between lots: metadata rows above the table come and go, the header row
//! moves, antigen columns vary, and the auto control hides as an ordinary row.
//!
//! `antigram-panel` recovers the structure heuristically instead of assuming
//! fixed coordinates, so a replacement workbook keeps working without code
//! changes.
//!
//! ## Features
//!
//! - **Header location**: Finds the table header by its identity column, not by row number
//! - **Metadata scan**: Harvests brand, lot, and expiry from the rows above the header
//! - **Antigen resolution**: Separates antigen columns from identity and test-phase columns
//! - **Auto control detection**: Pulls the auto control row out of the cell list
//! - **Graceful degradation**: Unrecognizable layouts yield an empty panel, never an error
//! - **Web surface**: Serves the panel as JSON and accepts replacement workbooks
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use antigram_panel::extract::extract;
//! use antigram_panel::parsing::xlsx;
//!
//! // Read the first sheet of the workbook into a grid of strings
//! let sheet = xlsx::load(Path::new("data/antigram.xlsx")).unwrap();
//!
//! // Run the extraction pipeline
//! let extraction = extract(&sheet.grid, &sheet.sheet_name);
//!
//! println!("{} panel cells", extraction.panel.cells.len());
//! for cell in &extraction.panel.cells {
//!     println!("cell {}: {:?}", cell.sel, cell.antigen);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Core data types for the grid snapshot and the extracted panel
//! - [`extract`]: The four-stage heuristic extraction pipeline
//! - [`parsing`]: Workbook decoding into a plain string grid
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: Web server exposing the panel and the upload endpoint

pub mod cli;
pub mod core;
pub mod extract;
pub mod parsing;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use crate::core::grid::Grid;
pub use crate::core::panel::{AutoControl, Panel, PanelCell, PanelMeta};
pub use crate::extract::{extract, Extraction, ExtractionTrace};
pub use crate::parsing::xlsx::SourceSheet;
