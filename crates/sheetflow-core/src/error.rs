//! Error types for Sheetflow core.

use sheetflow_engine::engine::FormatError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by spreadsheet operations.
///
/// Every operation that fails with one of these leaves the spreadsheet exactly
/// as it was before the call.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("invalid cell name '{0}'")]
    InvalidName(String),

    #[error("invalid formula: {0}")]
    Format(#[from] FormatError),

    #[error("setting {cell} would create a circular dependency ({})", .cycle.join(" -> "))]
    CircularDependency { cell: String, cycle: Vec<String> },

    #[error(transparent)]
    ReadWrite(#[from] ReadWriteError),
}

/// Errors raised while saving or loading a spreadsheet file.
#[derive(Error, Debug)]
pub enum ReadWriteError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed spreadsheet file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("version mismatch: file has '{found}', expected '{expected}'")]
    VersionMismatch { expected: String, found: String },

    #[error("cell {cell} could not be restored: {source}")]
    InvalidCell {
        cell: String,
        #[source]
        source: Box<SheetError>,
    },
}

pub type Result<T> = std::result::Result<T, SheetError>;
