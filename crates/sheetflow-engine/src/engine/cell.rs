//! Cell content and value types.
//!
//! - [`CellContent`] - what the user entered: a number, text, or a formula
//! - [`CellValue`] - what the content evaluates to

use std::fmt;

use super::error::{FormatError, FormulaError};
use super::formula::Formula;

/// The content stored in a cell.
///
/// Empty text is the content of a cell that does not exist.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContent {
    Number(f64),
    Text(String),
    Formula(Formula),
}

impl CellContent {
    pub fn empty() -> CellContent {
        CellContent::Text(String::new())
    }

    /// Classify user input with the identity normalizer and no extra validation.
    pub fn parse(input: &str) -> Result<CellContent, FormatError> {
        Self::parse_with(input, |v| v.to_string(), |_| true)
    }

    /// Classify user input.
    /// - Parses as a finite number -> Number
    /// - Starts with '=' -> Formula over the rest of the input
    /// - Otherwise -> Text (verbatim, possibly empty)
    pub fn parse_with<N, V>(input: &str, normalize: N, is_valid: V) -> Result<CellContent, FormatError>
    where
        N: Fn(&str) -> String,
        V: Fn(&str) -> bool,
    {
        if let Ok(n) = input.trim().parse::<f64>() {
            if n.is_finite() {
                return Ok(CellContent::Number(n));
            }
        }

        if let Some(formula) = input.strip_prefix('=') {
            return Ok(CellContent::Formula(Formula::with_rules(
                formula, normalize, is_valid,
            )?));
        }

        Ok(CellContent::Text(input.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Text(s) if s.is_empty())
    }

    /// Text that reproduces this content when entered again.
    pub fn to_input_string(&self) -> String {
        match self {
            CellContent::Number(n) => n.to_string(),
            CellContent::Text(s) => s.clone(),
            CellContent::Formula(f) => format!("={}", f),
        }
    }
}

impl fmt::Display for CellContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_input_string())
    }
}

/// The evaluated value of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Error(FormulaError),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }
}

impl From<Result<f64, FormulaError>> for CellValue {
    fn from(result: Result<f64, FormulaError>) -> Self {
        match result {
            Ok(n) => CellValue::Number(n),
            Err(e) => CellValue::Error(e),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers() {
        assert_eq!(CellContent::parse("42").unwrap(), CellContent::Number(42.0));
        assert_eq!(CellContent::parse(" 2.5 ").unwrap(), CellContent::Number(2.5));
        assert_eq!(CellContent::parse("-3").unwrap(), CellContent::Number(-3.0));
        assert_eq!(CellContent::parse("1e3").unwrap(), CellContent::Number(1000.0));
    }

    #[test]
    fn test_non_finite_numbers_are_text() {
        assert_eq!(CellContent::parse("NaN").unwrap(), CellContent::Text("NaN".to_string()));
        assert_eq!(CellContent::parse("inf").unwrap(), CellContent::Text("inf".to_string()));
    }

    #[test]
    fn test_parse_formula() {
        let content = CellContent::parse("= a1 + 2").unwrap();
        assert_eq!(content, CellContent::Formula(Formula::new("a1+2").unwrap()));
        assert_eq!(content.to_input_string(), "=a1+2");
    }

    #[test]
    fn test_parse_formula_applies_rules() {
        let content = CellContent::parse_with("=b2*2", |v| v.to_ascii_uppercase(), |_| true).unwrap();
        assert_eq!(content.to_input_string(), "=B2*2");
    }

    #[test]
    fn test_parse_formula_errors() {
        assert_eq!(CellContent::parse("="), Err(FormatError::Empty));
        assert!(CellContent::parse("=1+").is_err());
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(CellContent::parse("hello").unwrap(), CellContent::Text("hello".to_string()));
        assert_eq!(CellContent::parse(" a = b ").unwrap(), CellContent::Text(" a = b ".to_string()));
        assert!(CellContent::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_to_input_string_round_trips() {
        for input in ["3.25", "text", "=(x1+2)*y2"] {
            let content = CellContent::parse(input).unwrap();
            let again = CellContent::parse(&content.to_input_string()).unwrap();
            assert_eq!(content, again);
        }
    }

    #[test]
    fn test_value_display() {
        assert_eq!(CellValue::Number(7.0).to_string(), "7");
        assert_eq!(CellValue::Text("hi".into()).to_string(), "hi");
        assert_eq!(
            CellValue::Error(FormulaError::new("division by zero")).to_string(),
            "#ERR: division by zero"
        );
    }
}
