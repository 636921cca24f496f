//! Stable diagnostic codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category prefix of a diagnostic code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Lexical errors, prefixed `L`.
    Lex,
    /// Syntax errors, prefixed `P`.
    Parse,
    /// Analysis errors, prefixed `A`.
    Analysis,
}

impl Category {
    /// Single-character prefix used when displaying a code.
    pub fn prefix(self) -> char {
        match self {
            Category::Lex => 'L',
            Category::Parse => 'P',
            Category::Analysis => 'A',
        }
    }
}

/// A category plus a number, displayed like `P101`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The code's category.
    pub category: Category,
    /// Number within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a code from category and number.
    pub fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
