//! Syntax diagnostics.
//!
//! Every lexer or parser failure becomes a [`Diagnostic`]: a message, an
//! optional [`ErrorCode`], [`Label`]led spans and an optional help line.
//! [`crate::parse`] returns them wrapped in a [`ParseError`]. The lexer
//! keeps going after a bad character, so one `ParseError` may hold several
//! lexical diagnostics; the parser stops at its first.
//!
//! ```
//! # use ldl_parser::error::{Diagnostic, ErrorCode};
//! # use ldl_parser::Span;
//! let diag = Diagnostic::error("expected 3D vector")
//!     .with_code(ErrorCode::E100)
//!     .with_label(Span::new(12..13), "expected 3D vector")
//!     .with_help("vectors are written as `(x, y, z)`");
//!
//! assert_eq!(diag.to_string(), "error[E100]: expected 3D vector");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
