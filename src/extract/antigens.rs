//! Antigen column resolution.
//!
//! Antigen labels occupy the header between the identity/reference columns
//! and the test-phase columns (`20c`, `37c`, `IAT`, `Gel`, `Hasil`). The
//! resolver walks that span, stops at the first phase label, and keeps the
//! distinct labels it saw. Headers that never open a span (the phase block
//! starts immediately, or everything in between is blank) fall back to
//! treating every remaining label as an antigen.
//!
//! Labels are distinct as exact trimmed strings: `C` and `c` are different
//! antigens and both survive. Name lookups, by contrast, fold case and
//! trailing punctuation, so a lowercase label resolves to the first column
//! carrying that name in any case.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::core::grid::{fold, fold_key};
use crate::extract::header;

/// Substrings that mark a header label as a test-phase column.
pub const PHASE_MARKERS: &[&str] = &["20", "37", "iat", "gel", "hasil"];

/// First antigen column when the header lacks a named reference column.
const DEFAULT_START: usize = 2;

/// One antigen label with the header column it reads from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AntigenColumn {
    /// Trimmed label exactly as it appears in the header.
    pub label: String,
    /// Zero-based column index used when reading reactions.
    pub column: usize,
}

/// How the antigen span was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AntigenStrategy {
    /// Labels between the reference column and the first phase marker.
    HeaderSpan,
    /// The span yielded nothing; every populated label from column 2
    /// onward is treated as an antigen.
    AllColumns,
}

impl std::fmt::Display for AntigenStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::HeaderSpan => "header span",
            Self::AllColumns => "all columns",
        };
        write!(f, "{name}")
    }
}

/// The resolved antigen columns for one header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AntigenSet {
    pub columns: Vec<AntigenColumn>,
    pub strategy: AntigenStrategy,
}

/// Resolves antigen labels and their columns from the header row.
///
/// The name index is built once over the whole header; labels that cannot
/// be matched back by name (a label folding to an empty key) fall back to
/// `2 + position` in the resolved sequence.
#[must_use]
pub fn resolve(header: &[String]) -> AntigenSet {
    let index = label_index(header);
    let start = header::reference_column(header).map_or(DEFAULT_START, |col| col + 1);

    let mut labels = collect_span(header, start);
    let strategy = if labels.is_empty() {
        labels = collect_all(header);
        AntigenStrategy::AllColumns
    } else {
        AntigenStrategy::HeaderSpan
    };

    let columns = labels
        .into_iter()
        .enumerate()
        .map(|(position, label)| {
            let column = index
                .get(&fold_key(&label))
                .copied()
                .unwrap_or(DEFAULT_START + position);
            AntigenColumn { label, column }
        })
        .collect();

    AntigenSet { columns, strategy }
}

/// Maps each folded header label to the first column carrying it.
fn label_index(header: &[String]) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (col, cell) in header.iter().enumerate() {
        let key = fold_key(cell);
        if key.is_empty() {
            continue;
        }
        index.entry(key).or_insert(col);
    }
    index
}

/// Collects distinct labels from `start` up to the first phase marker.
/// Blank labels are skipped without ending the span.
fn collect_span(header: &[String], start: usize) -> Vec<String> {
    let mut labels = Vec::new();
    let mut seen = HashSet::new();
    for cell in header.iter().skip(start) {
        let folded = fold(cell);
        if PHASE_MARKERS.iter().any(|marker| folded.contains(marker)) {
            break;
        }
        let label = cell.trim();
        if label.is_empty() {
            continue;
        }
        if seen.insert(label) {
            labels.push(label.to_string());
        }
    }
    labels
}

/// Recovery path: every distinct populated label from column 2 onward, in
/// sheet order.
fn collect_all(header: &[String]) -> Vec<String> {
    let mut labels = Vec::new();
    let mut seen = HashSet::new();
    for cell in header.iter().skip(DEFAULT_START) {
        let label = cell.trim();
        if label.is_empty() {
            continue;
        }
        if seen.insert(label) {
            labels.push(label.to_string());
        }
    }
    labels
}
