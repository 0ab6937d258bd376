//! # LDL Parser
//!
//! Parser for the Level Description Language. This crate turns level source
//! text into an ordered list of [`Statement`]s and can print statements back
//! to canonical source text.
//!
//! ## Usage
//!
//! ```
//! # use ldl_parser::{parse, ParseError, Statement};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         using Rail as game.track.Rail
//!         let r1 be Rail(2), r2 be Rail(2)
//!         connect r2.tail to r1.head
//!     "#;
//!
//!     let statements = parse(source)?;
//!     assert_eq!(statements.len(), 4);
//!     assert!(matches!(statements[1].inner(), Statement::Declaration { .. }));
//!     Ok(())
//! }
//! ```

pub mod error;
mod lexer;
mod parser;
pub mod printer;
mod span;
mod statement;
mod tokens;

pub use error::ParseError;
pub use span::{Span, Spanned};
pub use statement::{Statement, StatementKind};

use log::debug;

/// Parse source text into statements.
///
/// This is the main entry point for parsing LDL source code:
///
/// 1. **Tokenize** - Convert source text to tokens, reporting every lexical error
/// 2. **Parse** - Build statements from tokens, stopping at the first grammatical error
///
/// # Errors
///
/// Returns a [`ParseError`] with one diagnostic per lexical error, or a single
/// diagnostic for the first grammatical error.
pub fn parse(source: &str) -> Result<Vec<Spanned<Statement>>, ParseError> {
    let tokens = lexer::tokenize(source)?;
    let statements = parser::build_statements(&tokens)?;

    debug!(tokens = tokens.len(), statements = statements.len(); "Parsed level source");
    Ok(statements)
}
