//! Writer for spreadsheet JSON files

use super::SheetFile;
use crate::error::ReadWriteError;
use std::fs;
use std::path::Path;

/// Write a spreadsheet file, replacing any existing file at `path`.
pub fn write_sheet(path: &Path, file: &SheetFile) -> Result<(), ReadWriteError> {
    let content = write_sheet_content(file).map_err(|source| ReadWriteError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, content).map_err(|source| ReadWriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a spreadsheet file. Cells come out in map order.
pub fn write_sheet_content(file: &SheetFile) -> serde_json::Result<String> {
    let mut content = serde_json::to_string_pretty(file)?;
    content.push('\n');
    Ok(content)
}
