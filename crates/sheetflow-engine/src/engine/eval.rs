//! Formula evaluation.
//!
//! Evaluation runs over the validated token stream with two stacks, one of
//! operands and one of pending operators. `*` and `/` are applied as soon as
//! their right operand is known, so they never stay on the operator stack past
//! an operand. `+` and `-` wait until the next `+`/`-`, a `)` or the end of the
//! formula.

use super::error::FormulaError;
use super::formula::{Formula, Operator, Token};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    Op(Operator),
    Open,
}

impl Formula {
    /// Evaluate the formula.
    ///
    /// `lookup` receives each normalized variable and returns its value, or the
    /// error to report for it. Division by zero or a failed lookup stops
    /// evaluation and becomes the result.
    pub fn evaluate<F>(&self, mut lookup: F) -> Result<f64, FormulaError>
    where
        F: FnMut(&str) -> Result<f64, FormulaError>,
    {
        let mut values: Vec<f64> = Vec::new();
        let mut pending: Vec<Pending> = Vec::new();

        for token in &self.tokens {
            match token {
                Token::Number(n) => push_operand(*n, &mut values, &mut pending)?,
                Token::Variable(name) => {
                    let n = lookup(name)?;
                    push_operand(n, &mut values, &mut pending)?;
                }
                Token::Op(op) if op.is_multiplicative() => pending.push(Pending::Op(*op)),
                Token::Op(op) => {
                    reduce_additive(&mut values, &mut pending)?;
                    pending.push(Pending::Op(*op));
                }
                Token::LParen => pending.push(Pending::Open),
                Token::RParen => {
                    reduce_additive(&mut values, &mut pending)?;
                    if pending.pop() != Some(Pending::Open) {
                        return Err(malformed());
                    }
                    if let Some(Pending::Op(op)) = pending.last().copied() {
                        if op.is_multiplicative() {
                            pending.pop();
                            let right = pop(&mut values)?;
                            let left = pop(&mut values)?;
                            values.push(apply(op, left, right)?);
                        }
                    }
                }
            }
        }

        reduce_additive(&mut values, &mut pending)?;
        let result = pop(&mut values)?;
        if !values.is_empty() || !pending.is_empty() {
            return Err(malformed());
        }
        Ok(result)
    }
}

/// Push an operand, first folding it into a waiting `*` or `/`.
fn push_operand(
    n: f64,
    values: &mut Vec<f64>,
    pending: &mut Vec<Pending>,
) -> Result<(), FormulaError> {
    if let Some(Pending::Op(op)) = pending.last().copied() {
        if op.is_multiplicative() {
            pending.pop();
            let left = pop(values)?;
            values.push(apply(op, left, n)?);
            return Ok(());
        }
    }
    values.push(n);
    Ok(())
}

/// Apply a waiting `+` or `-`, if there is one on top of the stack.
fn reduce_additive(values: &mut Vec<f64>, pending: &mut Vec<Pending>) -> Result<(), FormulaError> {
    if let Some(Pending::Op(op)) = pending.last().copied() {
        if !op.is_multiplicative() {
            pending.pop();
            let right = pop(values)?;
            let left = pop(values)?;
            values.push(apply(op, left, right)?);
        }
    }
    Ok(())
}

fn apply(op: Operator, left: f64, right: f64) -> Result<f64, FormulaError> {
    match op {
        Operator::Add => Ok(left + right),
        Operator::Sub => Ok(left - right),
        Operator::Mul => Ok(left * right),
        Operator::Div if right == 0.0 => Err(FormulaError::new("division by zero")),
        Operator::Div => Ok(left / right),
    }
}

fn pop(values: &mut Vec<f64>) -> Result<f64, FormulaError> {
    values.pop().ok_or_else(malformed)
}

fn malformed() -> FormulaError {
    FormulaError::new("malformed expression")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn eval(source: &str) -> Result<f64, FormulaError> {
        Formula::new(source)
            .unwrap()
            .evaluate(|name| Err(FormulaError::new(format!("undefined variable {name}"))))
    }

    fn eval_with(source: &str, vars: &[(&str, f64)]) -> Result<f64, FormulaError> {
        let vars: HashMap<&str, f64> = vars.iter().copied().collect();
        Formula::new(source).unwrap().evaluate(|name| {
            vars.get(name)
                .copied()
                .ok_or_else(|| FormulaError::new(format!("undefined variable {name}")))
        })
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("1+2*3"), Ok(7.0));
        assert_eq!(eval("(1+2)*3"), Ok(9.0));
        assert_eq!(eval("2*3+4*5"), Ok(26.0));
        assert_eq!(eval("10-4-3"), Ok(3.0));
        assert_eq!(eval("100/10/5"), Ok(2.0));
        assert_eq!(eval("2+6/3*2-1"), Ok(5.0));
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(eval("((5))"), Ok(5.0));
        assert_eq!(eval("2*(3+4)"), Ok(14.0));
        assert_eq!(eval("(2+3)*(4-1)"), Ok(15.0));
        assert_eq!(eval("10-(4-3)"), Ok(9.0));
        assert_eq!(eval("8/(2*(1+1))"), Ok(2.0));
        assert_eq!(eval("(1+1)*(1+(2*(3+4)))"), Ok(30.0));
    }

    #[test]
    fn test_mixed_expression() {
        // 4*2+3-3*4+9*(42-31)+3/3-4
        assert_eq!(eval("4*2+3-3*4+9*(42-31)+3/3-4"), Ok(95.0));
    }

    #[test]
    fn test_fractional_results() {
        assert_eq!(eval("1/4"), Ok(0.25));
        assert_eq!(eval("1.5e1 * .2"), Ok(3.0));
    }

    #[test]
    fn test_division_by_zero() {
        let err = eval("1/0").unwrap_err();
        assert_eq!(err.reason(), "division by zero");
        assert!(eval("5/(2-2)").is_err());
        assert!(eval("x/0").is_err());
    }

    #[test]
    fn test_variables() {
        assert_eq!(eval_with("x+7", &[("x", 2.0)]), Ok(9.0));
        assert_eq!(eval_with("a1*b1 - c1", &[("a1", 3.0), ("b1", 4.0), ("c1", 2.0)]), Ok(10.0));
        assert_eq!(eval_with("x/(y-1)", &[("x", 6.0), ("y", 4.0)]), Ok(2.0));
    }

    #[test]
    fn test_lookup_failure_short_circuits() {
        let err = eval_with("x + y", &[("x", 1.0)]).unwrap_err();
        assert_eq!(err.reason(), "undefined variable y");
    }

    #[test]
    fn test_malformed_token_stream() {
        let dangling = Formula::from_tokens_unchecked(vec![Token::Number(1.0), Token::Op(Operator::Add)]);
        assert_eq!(dangling.evaluate(|_| Ok(0.0)), Err(malformed()));

        let stray_close = Formula::from_tokens_unchecked(vec![Token::Number(1.0), Token::RParen]);
        assert_eq!(stray_close.evaluate(|_| Ok(0.0)), Err(malformed()));
    }

    #[test]
    fn test_lookup_receives_normalized_names() {
        let f = Formula::with_rules("a1 + b2", |v| v.to_ascii_uppercase(), |_| true).unwrap();
        let mut seen = Vec::new();
        let result = f.evaluate(|name| {
            seen.push(name.to_string());
            Ok(1.0)
        });
        assert_eq!(result, Ok(2.0));
        assert_eq!(seen, vec!["A1", "B2"]);
    }
}
