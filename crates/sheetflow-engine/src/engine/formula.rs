//! Parsed, validated infix formulas.
//!
//! A [`Formula`] is built once from source text and is immutable afterwards.
//! Construction checks the token sequence against a small grammar:
//!
//! - operands (numbers, variables, `(`) and operators/`)` must alternate;
//! - the first token opens an operand, the last one closes it;
//! - parentheses must balance;
//! - every variable, after normalization, must still be a variable and must
//!   satisfy the caller's validator.
//!
//! The source text is then discarded in favour of a canonical rendering with
//! normalized variables, normalized numerals and no whitespace. Equality and
//! hashing are defined over that canonical string only, so `"x1 + 2.0"` and
//! `"x1+2"` are the same formula.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use super::cell_ref::is_variable;
use super::error::FormatError;
use super::tokenizer::{is_numeral, tokenize};

/// Binary arithmetic operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    fn from_symbol(symbol: &str) -> Option<Operator> {
        match symbol {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Sub),
            "*" => Some(Operator::Mul),
            "/" => Some(Operator::Div),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    /// True for `*` and `/`.
    pub fn is_multiplicative(self) -> bool {
        matches!(self, Operator::Mul | Operator::Div)
    }
}

/// A validated token. Variables are stored in normalized form.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Variable(String),
    Op(Operator),
    LParen,
    RParen,
}

impl Token {
    /// Tokens that complete an operand: after one of these an operator or `)` must follow.
    fn closes_operand(&self) -> bool {
        matches!(self, Token::Number(_) | Token::Variable(_) | Token::RParen)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Variable(v) => f.write_str(v),
            Token::Op(op) => write!(f, "{}", op.symbol()),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

/// An arithmetic formula over named variables.
#[derive(Clone, Debug)]
pub struct Formula {
    pub(crate) tokens: Vec<Token>,
    canonical: String,
}

impl Formula {
    /// Parse `source` with the identity normalizer and a validator that accepts
    /// every variable.
    pub fn new(source: &str) -> Result<Formula, FormatError> {
        Self::with_rules(source, |v| v.to_string(), |_| true)
    }

    /// Parse `source`, normalizing each variable with `normalize` and rejecting
    /// the formula if any normalized variable fails `is_valid`.
    pub fn with_rules<N, V>(source: &str, normalize: N, is_valid: V) -> Result<Formula, FormatError>
    where
        N: Fn(&str) -> String,
        V: Fn(&str) -> bool,
    {
        let mut tokens: Vec<Token> = Vec::new();
        let mut depth: usize = 0;

        for raw in tokenize(source) {
            let token = classify(raw, &normalize, &is_valid)?;

            match tokens.last() {
                None => {
                    if !matches!(token, Token::Number(_) | Token::Variable(_) | Token::LParen) {
                        return Err(FormatError::InvalidStart(raw.to_string()));
                    }
                }
                Some(prev) if prev.closes_operand() => {
                    if !matches!(token, Token::Op(_) | Token::RParen) {
                        return Err(FormatError::UnexpectedToken {
                            after: prev.to_string(),
                            found: raw.to_string(),
                        });
                    }
                }
                Some(prev) => {
                    if !matches!(token, Token::Number(_) | Token::Variable(_) | Token::LParen) {
                        return Err(FormatError::UnexpectedToken {
                            after: prev.to_string(),
                            found: raw.to_string(),
                        });
                    }
                }
            }

            match token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth = depth.checked_sub(1).ok_or(FormatError::UnbalancedParens)?;
                }
                _ => {}
            }

            tokens.push(token);
        }

        let Some(last) = tokens.last() else {
            return Err(FormatError::Empty);
        };
        if !last.closes_operand() {
            return Err(FormatError::InvalidEnd(last.to_string()));
        }
        if depth != 0 {
            return Err(FormatError::UnbalancedParens);
        }

        let canonical = tokens.iter().map(Token::to_string).collect();
        Ok(Formula { tokens, canonical })
    }

    /// The distinct normalized variables used by this formula.
    pub fn variables(&self) -> BTreeSet<&str> {
        self.tokens
            .iter()
            .filter_map(|token| match token {
                Token::Variable(v) => Some(v.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Canonical text of the formula (no whitespace, normalized tokens).
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Build a formula from tokens without validating them.
    #[cfg(test)]
    pub(crate) fn from_tokens_unchecked(tokens: Vec<Token>) -> Formula {
        let canonical = tokens.iter().map(Token::to_string).collect();
        Formula { tokens, canonical }
    }
}

fn classify<N, V>(raw: &str, normalize: &N, is_valid: &V) -> Result<Token, FormatError>
where
    N: Fn(&str) -> String,
    V: Fn(&str) -> bool,
{
    if raw == "(" {
        return Ok(Token::LParen);
    }
    if raw == ")" {
        return Ok(Token::RParen);
    }
    if let Some(op) = Operator::from_symbol(raw) {
        return Ok(Token::Op(op));
    }
    if is_numeral(raw) {
        return match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Token::Number(n)),
            _ => Err(FormatError::NumberOutOfRange(raw.to_string())),
        };
    }
    if is_variable(raw) {
        let normalized = normalize(raw);
        if !is_variable(&normalized) {
            return Err(FormatError::IllegalNormalization {
                variable: raw.to_string(),
                normalized,
            });
        }
        if !is_valid(&normalized) {
            return Err(FormatError::RejectedVariable(normalized));
        }
        return Ok(Token::Variable(normalized));
    }
    Err(FormatError::InvalidToken(raw.to_string()))
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Formula {}

impl Hash for Formula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl FromStr for Formula {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::new(s)
    }
}
