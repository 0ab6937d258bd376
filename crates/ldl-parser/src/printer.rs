//! Canonical LDL printer.
//!
//! [`format_statements`] writes a statement list back to source text that
//! parses to an equal list. Numbers use the shortest representation that
//! reads back to the same `f64`, and consecutive statements of the same kind
//! can share one keyword block.
//!
//! # Example
//!
//! ```
//! # use ldl_parser::{parse, printer::{FormatConfig, format_statements}};
//! let statements = parse("let   a be Box( 1.50 ),b be Box()").unwrap();
//! let text = format_statements(&statements, &FormatConfig::default()).unwrap();
//! assert_eq!(text, "let a be Box(1.5),\n    b be Box()\n");
//! ```

use glam::DVec3;
use serde::Deserialize;
use thiserror::Error;

use ldl_core::{identifier::Id, literal::Literal};

use crate::{lexer::is_identifier, span::Spanned, statement::Statement};

/// Errors for statements that have no LDL spelling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Strings are delimited by `]` and normalize carriage returns, so
    /// neither character survives a round trip.
    #[error("string {0:?} cannot be written as an LDL literal")]
    UnrepresentableString(String),

    #[error("number {0} is not finite")]
    NonFiniteNumber(f64),

    #[error("`{0}` is not a valid identifier")]
    InvalidIdentifier(String),
}

/// Layout options for [`format_statements`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Join consecutive statements of the same kind under one keyword.
    group_statements: bool,

    /// Spaces before each continuation pair of a grouped block.
    indent: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            group_statements: true,
            indent: 4,
        }
    }
}

impl FormatConfig {
    pub fn new(group_statements: bool, indent: usize) -> Self {
        Self {
            group_statements,
            indent,
        }
    }

    pub fn group_statements(&self) -> bool {
        self.group_statements
    }

    pub fn indent(&self) -> usize {
        self.indent
    }
}

/// Formats statements as canonical LDL source text.
///
/// # Errors
///
/// Returns a [`FormatError`] if a statement holds a value with no LDL
/// spelling, such as a string containing `]`.
pub fn format_statements(
    statements: &[Spanned<Statement>],
    config: &FormatConfig,
) -> Result<String, FormatError> {
    let mut output = String::new();
    let continuation = format!(",\n{}", " ".repeat(config.indent));
    let mut previous = None;

    for statement in statements {
        let kind = statement.kind();
        if config.group_statements && previous == Some(kind) {
            output.push_str(&continuation);
        } else {
            if previous.is_some() {
                output.push('\n');
            }
            output.push_str(kind.keyword());
            output.push(' ');
        }
        output.push_str(&format_pair(statement)?);
        previous = Some(kind);
    }

    if previous.is_some() {
        output.push('\n');
    }
    Ok(output)
}

/// Formats one statement without its keyword, e.g. `e1 at (0, 1, 2)`.
fn format_pair(statement: &Statement) -> Result<String, FormatError> {
    let pair = match statement {
        Statement::Alias { alias, class } => {
            format!("{} as {}", name(alias)?, dotted_name(class)?)
        }
        Statement::Declaration { name: entity, class, args } => {
            let args = args
                .iter()
                .map(|arg| format_literal(arg))
                .collect::<Result<Vec<_>, _>>()?;
            format!(
                "{} be {}({})",
                name(entity)?,
                dotted_name(class)?,
                args.join(", ")
            )
        }
        Statement::Position {
            name: entity,
            position,
            relative_to,
        } => {
            let mut pair = format!("{} at {}", name(entity)?, format_vector(position)?);
            if let Some(other) = relative_to {
                pair.push_str(" from ");
                pair.push_str(name(other)?);
            }
            pair
        }
        Statement::Connection {
            moved,
            moved_connector,
            base,
            base_connector,
        } => format!(
            "{}.{} to {}.{}",
            name(moved)?,
            name(moved_connector)?,
            name(base)?,
            name(base_connector)?
        ),
    };
    Ok(pair)
}

fn name(id: &Id) -> Result<&str, FormatError> {
    if is_identifier(id.as_str()) {
        Ok(id.as_str())
    } else {
        Err(FormatError::InvalidIdentifier(id.to_string()))
    }
}

fn dotted_name(id: &Id) -> Result<&str, FormatError> {
    if id.segments().all(is_identifier) {
        Ok(id.as_str())
    } else {
        Err(FormatError::InvalidIdentifier(id.to_string()))
    }
}

/// Formats a literal constructor argument.
pub fn format_literal(literal: &Literal) -> Result<String, FormatError> {
    match literal {
        Literal::String(value) => {
            if value.contains([']', '\r']) {
                Err(FormatError::UnrepresentableString(value.clone()))
            } else {
                Ok(format!("[{value}]"))
            }
        }
        Literal::Number(value) => format_number(*value),
        Literal::Vector(value) => format_vector(value),
    }
}

fn format_vector(vector: &DVec3) -> Result<String, FormatError> {
    Ok(format!(
        "({}, {}, {})",
        format_number(vector.x)?,
        format_number(vector.y)?,
        format_number(vector.z)?
    ))
}

/// Shortest decimal text that reads back to the same value.
///
/// `f64`'s `Display` never uses exponent notation, which LDL lacks.
fn format_number(value: f64) -> Result<String, FormatError> {
    if value.is_finite() {
        Ok(value.to_string())
    } else {
        Err(FormatError::NonFiniteNumber(value))
    }
}
