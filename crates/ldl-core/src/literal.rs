//! Literal values accepted as constructor arguments.

use std::fmt;

use glam::DVec3;
use serde::Deserialize;

/// A literal constructor argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Bracketed string, with line endings normalized to `\n`.
    String(String),
    /// Signed decimal number.
    Number(f64),
    /// Parenthesized 3-tuple of numbers.
    Vector(DVec3),
}

/// The kind of a [`Literal`], used for exact constructor matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralKind {
    String,
    Number,
    Vector,
}

impl Literal {
    /// Returns the kind of this literal.
    pub fn kind(&self) -> LiteralKind {
        match self {
            Self::String(_) => LiteralKind::String,
            Self::Number(_) => LiteralKind::Number,
            Self::Vector(_) => LiteralKind::Vector,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<DVec3> {
        match self {
            Self::Vector(value) => Some(*value),
            _ => None,
        }
    }
}

impl LiteralKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Vector => "vector",
        }
    }
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats a list of kinds as a signature, e.g. `(string, number)`.
pub fn signature(kinds: &[LiteralKind]) -> String {
    let names: Vec<_> = kinds.iter().map(LiteralKind::as_str).collect();
    format!("({})", names.join(", "))
}
