//! Core data types for antigram panel extraction.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Grid`]: A rectangular snapshot of one worksheet as display strings
//! - [`Panel`]: The structured extraction result served to clients
//! - [`PanelMeta`]: Brand, lot, and expiry text scanned from above the header
//! - [`PanelCell`]: One reagent red cell row with its antigen reactions
//! - [`AutoControl`]: Patient auto-control results split by test phase
//!
//! ## Cell Folding
//!
//! Worksheet cells arrive as formatted display text. Heuristic matching
//! never compares raw cells; it folds them first:
//!
//! | Form | Transformation | Used for |
//! |------|----------------|----------|
//! | `fold` | trim + lowercase | keyword and synonym checks |
//! | `fold_key` | `fold` + strip trailing punctuation | header name lookups |
//!
//! Folding is applied on the fly wherever two cells are compared; the
//! stored cell text itself is never mutated.

pub mod grid;
pub mod panel;
