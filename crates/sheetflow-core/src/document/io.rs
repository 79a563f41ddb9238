use super::{SheetOptions, Spreadsheet};
use crate::error::{ReadWriteError, Result, SheetError};
use crate::storage::{CellRecord, SheetFile, parse_sheet, parse_sheet_content, write_sheet};
use indexmap::IndexMap;
use std::path::Path;
use tracing::info;

impl Spreadsheet {
    /// Snapshot of the contents in the persisted form, cells sorted by name.
    pub fn to_sheet_file(&self) -> SheetFile {
        let mut cells: IndexMap<String, CellRecord> = self
            .cells
            .iter()
            .map(|(name, cell)| {
                let record = CellRecord {
                    string_form: cell.contents().to_input_string(),
                };
                (name.clone(), record)
            })
            .collect();
        cells.sort_unstable_keys();
        SheetFile {
            cells,
            version: self.options.version.clone(),
        }
    }

    /// Save to `path` and clear the unsaved-changes flag.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        write_sheet(path, &self.to_sheet_file())?;
        self.changed = false;
        info!(path = %path.display(), cells = self.cells.len(), "saved spreadsheet");
        Ok(())
    }

    /// Open a saved spreadsheet. The file's version must match `options.version`.
    pub fn open(path: impl AsRef<Path>, options: SheetOptions) -> Result<Spreadsheet> {
        let path = path.as_ref();
        let sheet = Self::from_sheet_file(parse_sheet(path)?, options)?;
        info!(path = %path.display(), cells = sheet.cells.len(), "opened spreadsheet");
        Ok(sheet)
    }

    /// Replace this spreadsheet's cells with the ones saved at `path`, keeping
    /// the current options. On error the spreadsheet is left untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        *self = Self::open(path, self.options.clone())?;
        Ok(())
    }

    /// Build a spreadsheet from JSON text in the persisted format.
    pub fn from_json(content: &str, options: SheetOptions) -> Result<Spreadsheet> {
        let file = parse_sheet_content(content).map_err(|source| ReadWriteError::Json {
            path: "<memory>".into(),
            source,
        })?;
        Self::from_sheet_file(file, options)
    }

    /// Rebuild every saved cell through [`Spreadsheet::set_contents_of_cell`].
    pub fn from_sheet_file(file: SheetFile, options: SheetOptions) -> Result<Spreadsheet> {
        if file.version != options.version {
            return Err(ReadWriteError::VersionMismatch {
                expected: options.version,
                found: file.version,
            }
            .into());
        }

        let mut sheet = Spreadsheet::with_options(options);
        for (name, record) in file.cells {
            if let Err(e) = sheet.set_contents_of_cell(&name, &record.string_form) {
                return Err(invalid_cell(name, e));
            }
        }
        sheet.changed = false;
        Ok(sheet)
    }
}

fn invalid_cell(cell: String, source: SheetError) -> SheetError {
    ReadWriteError::InvalidCell {
        cell,
        source: Box::new(source),
    }
    .into()
}
