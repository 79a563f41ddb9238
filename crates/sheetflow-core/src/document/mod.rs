//! Spreadsheet state and logic (UI-agnostic).

mod io;
mod ops;
mod state;

pub use ops::Recalculation;
pub use state::{DEFAULT_VERSION, Normalizer, SheetOptions, Spreadsheet, Validator};
