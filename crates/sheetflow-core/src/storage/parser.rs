//! Reader for spreadsheet JSON files

use super::SheetFile;
use crate::error::ReadWriteError;
use std::fs;
use std::path::Path;

/// Read and parse a spreadsheet file.
pub fn parse_sheet(path: &Path) -> Result<SheetFile, ReadWriteError> {
    let content = fs::read_to_string(path).map_err(|source| ReadWriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_sheet_content(&content).map_err(|source| ReadWriteError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse spreadsheet JSON from a string.
pub fn parse_sheet_content(content: &str) -> serde_json::Result<SheetFile> {
    serde_json::from_str(content)
}
