//! Stable codes for syntax diagnostics.
//!
//! `E0xx` codes come from the lexer, `E1xx` codes from the parser.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A `[` string with no closing `]`.
    E001,
    E002,
    /// Number digits that do not fit in a finite `f64`.
    E003,
    /// A `/*` comment with no closing `*/`.
    E004,
    E100,
    /// The source ended inside a statement.
    E101,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        self.entry().0
    }

    /// Short description, used as the primary label of lexer diagnostics.
    pub fn description(&self) -> &'static str {
        self.entry().1
    }

    fn entry(&self) -> (&'static str, &'static str) {
        match self {
            ErrorCode::E001 => ("E001", "unterminated string literal"),
            ErrorCode::E002 => ("E002", "unexpected character"),
            ErrorCode::E003 => ("E003", "number out of range"),
            ErrorCode::E004 => ("E004", "unterminated block comment"),
            ErrorCode::E100 => ("E100", "unexpected token"),
            ErrorCode::E101 => ("E101", "incomplete input"),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
