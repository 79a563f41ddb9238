//! Spreadsheet engine API.
//!
//! This module provides the computation core of the spreadsheet:
//!
//! - [`tokenize`] - Split formula text into tokens
//! - [`Formula`] - Parsed, validated formulas with canonical text
//! - [`Formula::evaluate`] - Evaluate a formula against a variable lookup
//! - [`DependencyGraph`] - Which cells read which
//! - [`recalculation_order`] - Topological recalculation order with cycle detection
//! - [`CellContent`], [`CellValue`] - What a cell holds and what it evaluates to
//! - [`is_cell_name`], [`is_variable`] - Name shape checks

mod cell;
mod cell_ref;
mod cycle;
mod deps;
mod error;
mod eval;
mod formula;
mod tokenizer;

pub use cell::{CellContent, CellValue};
pub use cell_ref::{is_cell_name, is_variable};
pub use cycle::{CircularDependency, recalculation_order};
pub use deps::DependencyGraph;
pub use error::{FormatError, FormulaError};
pub use formula::{Formula, Operator};
pub use tokenizer::{Tokens, is_numeral, tokenize};
