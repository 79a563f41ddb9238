//! sheetflow-core - cell store, recalculation and persistence.

pub mod document;
pub mod error;
pub mod storage;

pub use document::{Recalculation, SheetOptions, Spreadsheet};
pub use error::{ReadWriteError, Result, SheetError};

pub use sheetflow_engine::engine::{CellContent, CellValue, FormatError, Formula, FormulaError};
