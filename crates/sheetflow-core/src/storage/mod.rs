//! JSON persistence format.
//!
//! ```json
//! {
//!   "cells": { "A1": { "stringForm": "5" }, "B1": { "stringForm": "=A1*2" } },
//!   "Version": "default"
//! }
//! ```

pub mod parser;
pub mod writer;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use parser::{parse_sheet, parse_sheet_content};
pub use writer::{write_sheet, write_sheet_content};

/// On-disk form of a spreadsheet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetFile {
    /// Cells in file order; loading replays them in this order
    pub cells: IndexMap<String, CellRecord>,
    #[serde(rename = "Version")]
    pub version: String,
}

/// One saved cell: the text that recreates its content when entered again.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    #[serde(rename = "stringForm")]
    pub string_form: String,
}
