use super::Spreadsheet;
use super::state::Cell;
use crate::error::{Result, SheetError};
use sheetflow_engine::engine::{
    CellContent, CellValue, FormulaError, is_cell_name, recalculation_order,
};
use tracing::{debug, warn};

/// Outcome of a successful edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recalculation {
    /// The edited cell followed by every cell whose value was recomputed,
    /// each after the cells it reads.
    pub order: Vec<String>,
    /// Whether the store now has unsaved changes.
    pub unsaved: bool,
}

impl Spreadsheet {
    /// Normalize a cell name and check it against the shape rule and the
    /// validator.
    pub(crate) fn checked_name(&self, name: &str) -> Result<String> {
        let normalized = self.options.normalize(name);
        if is_cell_name(&normalized) && self.options.is_valid(&normalized) {
            Ok(normalized)
        } else {
            Err(SheetError::InvalidName(name.to_string()))
        }
    }

    /// Set the contents of a cell from user input and recalculate.
    ///
    /// - A finite number becomes number content
    /// - Input starting with `=` becomes a formula over the rest
    /// - Anything else is text; empty text removes the cell
    ///
    /// On error nothing changes: not the cell, not the graph, not any value.
    pub fn set_contents_of_cell(&mut self, name: &str, input: &str) -> Result<Recalculation> {
        let name = self.checked_name(name)?;
        let content = CellContent::parse_with(
            input,
            |v| self.options.normalize(v),
            |v| self.options.is_valid(v),
        )?;

        let reads: Vec<String> = match &content {
            CellContent::Formula(formula) => {
                formula.variables().into_iter().map(str::to_string).collect()
            }
            _ => Vec::new(),
        };
        let previous: Vec<String> = self.graph.dependees(&name).map(str::to_string).collect();
        self.graph.replace_dependees(&name, &reads);

        let order = match recalculation_order(&self.graph, &name) {
            Ok(order) => order,
            Err(cycle) => {
                self.graph.replace_dependees(&name, &previous);
                warn!(cell = %name, %cycle, "rejected edit");
                return Err(SheetError::CircularDependency {
                    cell: name,
                    cycle: cycle.cycle,
                });
            }
        };

        self.commit(&name, content);
        self.recalculate(&order[1..]);
        self.changed = true;
        debug!(cell = %name, recalculated = order.len() - 1, "cell updated");

        Ok(Recalculation {
            order,
            unsaved: self.changed,
        })
    }

    fn commit(&mut self, name: &str, content: CellContent) {
        let cell = match content {
            CellContent::Number(n) => Cell::Number(n),
            CellContent::Text(text) if text.is_empty() => {
                self.cells.remove(name);
                return;
            }
            CellContent::Text(text) => Cell::Text(text),
            CellContent::Formula(formula) => {
                let value = formula.evaluate(|v| self.lookup(v));
                Cell::Formula { formula, value }
            }
        };
        self.cells.insert(name.to_string(), cell);
    }

    /// Re-evaluate formula cells, in the given order.
    fn recalculate(&mut self, names: &[String]) {
        for name in names {
            let value = match self.cells.get(name) {
                Some(Cell::Formula { formula, .. }) => formula.evaluate(|v| self.lookup(v)),
                _ => continue,
            };
            if let Some(Cell::Formula { value: slot, .. }) = self.cells.get_mut(name) {
                *slot = value;
            }
        }
    }

    /// Numeric value of a cell, as seen by formulas.
    fn lookup(&self, name: &str) -> std::result::Result<f64, FormulaError> {
        match self.cells.get(name) {
            Some(Cell::Number(n)) | Some(Cell::Formula { value: Ok(n), .. }) => Ok(*n),
            Some(Cell::Formula { value: Err(e), .. }) => Err(FormulaError::new(format!(
                "{name} has an error: {}",
                e.reason()
            ))),
            Some(Cell::Text(_)) => Err(FormulaError::new(format!("{name} is not a number"))),
            None => Err(FormulaError::new(format!("{name} is empty"))),
        }
    }

    /// Contents of a cell. Cells that were never set read as empty text.
    pub fn cell_contents(&self, name: &str) -> Result<CellContent> {
        let name = self.checked_name(name)?;
        Ok(self
            .cells
            .get(&name)
            .map_or_else(CellContent::empty, Cell::contents))
    }

    /// Value of a cell. Cells that were never set read as empty text.
    pub fn cell_value(&self, name: &str) -> Result<CellValue> {
        let name = self.checked_name(name)?;
        Ok(self
            .cells
            .get(&name)
            .map_or_else(|| CellValue::Text(String::new()), Cell::value))
    }

    /// Names of all non-empty cells, sorted.
    pub fn nonempty_cell_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cells.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// The cell followed by everything that transitively reads it, in
    /// recalculation order.
    pub fn all_dependents(&self, name: &str) -> Result<Vec<String>> {
        let name = self.checked_name(name)?;
        recalculation_order(&self.graph, &name).map_err(|cycle| SheetError::CircularDependency {
            cell: name,
            cycle: cycle.cycle,
        })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
