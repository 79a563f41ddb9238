use sheetflow_engine::engine::{CellContent, CellValue, DependencyGraph, Formula, FormulaError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Version tag used when none is configured.
pub const DEFAULT_VERSION: &str = "default";

pub type Normalizer = Arc<dyn Fn(&str) -> String + Send + Sync>;
pub type Validator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Naming rules and version tag for a spreadsheet.
///
/// The normalizer maps every cell name (and every variable in a formula) to
/// its canonical spelling. The validator then gets a say on top of the
/// built-in letters-then-digits rule.
#[derive(Clone)]
pub struct SheetOptions {
    pub version: String,
    pub(crate) normalizer: Normalizer,
    pub(crate) validator: Validator,
}

impl SheetOptions {
    pub fn new(version: impl Into<String>) -> Self {
        SheetOptions {
            version: version.into(),
            normalizer: Arc::new(|name| name.to_string()),
            validator: Arc::new(|_| true),
        }
    }

    pub fn with_normalizer<F>(mut self, normalizer: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.normalizer = Arc::new(normalizer);
        self
    }

    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.validator = Arc::new(validator);
        self
    }

    /// Treat `a1` and `A1` as the same cell.
    pub fn uppercase_names(self) -> Self {
        self.with_normalizer(|name| name.to_ascii_uppercase())
    }

    pub(crate) fn normalize(&self, name: &str) -> String {
        (self.normalizer)(name)
    }

    pub(crate) fn is_valid(&self, name: &str) -> bool {
        (self.validator)(name)
    }
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION)
    }
}

impl fmt::Debug for SheetOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetOptions")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// A non-empty cell. Formula cells carry their last computed value.
#[derive(Clone, Debug)]
pub(crate) enum Cell {
    Number(f64),
    Text(String),
    Formula {
        formula: Formula,
        value: Result<f64, FormulaError>,
    },
}

impl Cell {
    pub(crate) fn contents(&self) -> CellContent {
        match self {
            Cell::Number(n) => CellContent::Number(*n),
            Cell::Text(s) => CellContent::Text(s.clone()),
            Cell::Formula { formula, .. } => CellContent::Formula(formula.clone()),
        }
    }

    pub(crate) fn value(&self) -> CellValue {
        match self {
            Cell::Number(n) => CellValue::Number(*n),
            Cell::Text(s) => CellValue::Text(s.clone()),
            Cell::Formula { value, .. } => CellValue::from(value.clone()),
        }
    }
}

/// UI-agnostic spreadsheet state.
pub struct Spreadsheet {
    /// Non-empty cells keyed by normalized name
    pub(crate) cells: HashMap<String, Cell>,
    /// (s, t): formula in t reads s
    pub(crate) graph: DependencyGraph,
    pub(crate) options: SheetOptions,
    /// Whether there are edits since the last save or load
    pub(crate) changed: bool,
}

impl Spreadsheet {
    /// Empty spreadsheet with the identity normalizer, no extra validation
    /// and version "default".
    pub fn new() -> Self {
        Self::with_options(SheetOptions::default())
    }

    pub fn with_options(options: SheetOptions) -> Self {
        Spreadsheet {
            cells: HashMap::new(),
            graph: DependencyGraph::new(),
            options,
            changed: false,
        }
    }

    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    pub fn version(&self) -> &str {
        &self.options.version
    }

    /// True when there are edits that have not been saved.
    pub fn changed(&self) -> bool {
        self.changed
    }
}

impl Default for Spreadsheet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Spreadsheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spreadsheet")
            .field("cells", &self.cells.len())
            .field("options", &self.options)
            .field("changed", &self.changed)
            .finish()
    }
}
