//! Wire types for the extracted panel.
//!
//! These types define the JSON contract served by `/panel.json` and printed
//! by the CLI. Field names follow the casing the client already consumes
//! (`isAuto`, `sourceSheetName`, phase keys `20c`/`37c`), so every rename
//! is pinned with a serde attribute rather than left to convention.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Panel-level metadata scanned from the rows above the header.
///
/// Fields keep whatever formatted text the worksheet held; absent metadata
/// stays an empty string rather than `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelMeta {
    pub brand: String,
    pub lot: String,
    pub expiry: String,
}

/// One reagent red cell row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelCell {
    /// Cell identity from the first column (e.g. `"1"`, `"II"`).
    pub sel: String,
    /// Reference or donor code from the second column.
    #[serde(rename = "ref")]
    pub reference: String,
    /// Reaction grade per antigen label. Keys are the trimmed header
    /// labels; every resolved label is present even when the cell is blank.
    pub antigen: BTreeMap<String, String>,
    /// True only for rows recognized as the patient auto control.
    #[serde(rename = "isAuto")]
    pub is_auto: bool,
}

/// Auto-control results across the four standard test phases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoControl {
    #[serde(rename = "20c")]
    pub phase_20c: String,
    #[serde(rename = "37c")]
    pub phase_37c: String,
    pub iat: String,
    pub gel: String,
}

impl AutoControl {
    /// True when no phase carries a result.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phase_20c.is_empty()
            && self.phase_37c.is_empty()
            && self.iat.is_empty()
            && self.gel.is_empty()
    }
}

/// The structured extraction result for one workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    /// Always `true` for a decoded panel. Failure responses are built
    /// separately with `ok: false` and an `error` message.
    pub ok: bool,
    /// The trimmed header row, in sheet order.
    pub header: Vec<String>,
    pub meta: PanelMeta,
    pub cells: Vec<PanelCell>,
    pub auto: AutoControl,
    #[serde(rename = "sourceSheetName")]
    pub source_sheet_name: String,
}

impl Panel {
    /// Assembles a successful panel.
    #[must_use]
    pub fn new(
        header: Vec<String>,
        meta: PanelMeta,
        cells: Vec<PanelCell>,
        auto: AutoControl,
        source_sheet_name: impl Into<String>,
    ) -> Self {
        Self {
            ok: true,
            header,
            meta,
            cells,
            auto,
            source_sheet_name: source_sheet_name.into(),
        }
    }
}
