//! Lexical splitting of formula text.
//!
//! Recognised tokens are `(`, `)`, the four operators `+ - * /`, variables
//! (`[A-Za-z_][A-Za-z0-9_]*`) and unsigned floating-point numerals with an
//! optional exponent. Whitespace only separates tokens. Anything else is
//! passed through verbatim so the caller can reject it with a useful message.

use regex::Regex;
use std::sync::OnceLock;

use super::cell_ref::VARIABLE_PATTERN;

const NUMBER_PATTERN: &str = r"(?:[0-9]+\.[0-9]*|[0-9]*\.[0-9]+|[0-9]+)(?:[eE][+-]?[0-9]+)?";

fn token_re() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        let pattern = format!(
            r"\(|\)|[+\-*/]|{}|{}|\s+",
            VARIABLE_PATTERN, NUMBER_PATTERN
        );
        Regex::new(&pattern).expect("token regex must compile")
    })
}

fn number_re() -> &'static Regex {
    static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    NUMBER_RE.get_or_init(|| {
        Regex::new(&format!("^{}$", NUMBER_PATTERN)).expect("number regex must compile")
    })
}

/// Returns true if `token` is an unsigned numeral as the tokenizer reads it.
pub fn is_numeral(token: &str) -> bool {
    number_re().is_match(token)
}

/// Split `source` into tokens.
///
/// The returned iterator borrows `source` and does no work until polled; clone
/// it (or call `tokenize` again) to restart from the beginning.
pub fn tokenize(source: &str) -> Tokens<'_> {
    Tokens { source, pos: 0 }
}

/// Lazy token iterator produced by [`tokenize`].
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        while self.pos < self.source.len() {
            let Some(m) = token_re().find_at(self.source, self.pos) else {
                // Trailing run that matches nothing.
                let rest = &self.source[self.pos..];
                self.pos = self.source.len();
                return Some(rest);
            };

            if m.start() > self.pos {
                let gap = &self.source[self.pos..m.start()];
                self.pos = m.start();
                return Some(gap);
            }

            self.pos = m.end();
            if !m.as_str().trim().is_empty() {
                return Some(m.as_str());
            }
        }
        None
    }
}
