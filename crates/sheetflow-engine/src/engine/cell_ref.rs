//! Shape checks for cell names and formula variables.
//!
//! A cell name is a run of letters followed by a run of digits (`A1`, `xy32`,
//! `BC7`). A formula variable is looser: a letter or underscore followed by any
//! run of letters, digits and underscores. Every cell name is a variable, but
//! not the other way round (`x`, `_tmp`, `a1b` are variables only).
//!
//! # Examples
//!
//! ```
//! use sheetflow_engine::engine::{is_cell_name, is_variable};
//!
//! assert!(is_cell_name("B3"));
//! assert!(!is_cell_name("B"));
//! assert!(is_variable("_b3x"));
//! ```

use regex::Regex;
use std::sync::OnceLock;

pub(crate) const VARIABLE_PATTERN: &str = r"[A-Za-z_][A-Za-z0-9_]*";

fn cell_name_re() -> &'static Regex {
    static CELL_NAME_RE: OnceLock<Regex> = OnceLock::new();
    CELL_NAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z]+[0-9]+$").expect("cell name regex must compile")
    })
}

fn variable_re() -> &'static Regex {
    static VARIABLE_RE: OnceLock<Regex> = OnceLock::new();
    VARIABLE_RE.get_or_init(|| {
        Regex::new(&format!("^{}$", VARIABLE_PATTERN)).expect("variable regex must compile")
    })
}

/// Returns true if `name` is one or more letters followed by one or more digits.
pub fn is_cell_name(name: &str) -> bool {
    cell_name_re().is_match(name)
}

/// Returns true if `token` has the shape of a formula variable.
pub fn is_variable(token: &str) -> bool {
    variable_re().is_match(token)
}
