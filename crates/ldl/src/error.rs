//! Error types for LDL operations.
//!
//! [`LdlError`] is the error returned at the API edge. It keeps the three
//! failure channels apart: I/O, syntax ([`ParseError`]) and semantic
//! ([`LevelLoadError`]).

use std::{fmt, io};

use thiserror::Error;

use ldl_core::registry::BoxError;
use ldl_parser::{Span, error::ParseError};

/// The main error type for LDL operations.
///
/// # Diagnostic Variants
///
/// The `Syntax` and `Load` variants carry the level source so that callers can
/// render the failing location with a snippet.
#[derive(Debug, Error)]
pub enum LdlError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Syntax { err: ParseError, src: String },

    #[error("{err}")]
    Load { err: LevelLoadError, src: String },
}

impl LdlError {
    /// Create a new `Syntax` error with the associated source code.
    pub fn new_syntax_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Syntax {
            err,
            src: src.into(),
        }
    }

    /// Create a new `Load` error with the associated source code.
    pub fn new_load_error(err: LevelLoadError, src: impl Into<String>) -> Self {
        Self::Load {
            err,
            src: src.into(),
        }
    }
}

/// Failure class of a [`LevelLoadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadErrorKind {
    /// The referenced class is not registered.
    InvalidClass,
    /// The class is registered but does not build entities.
    IncompatibleClass,
    /// No constructor takes the supplied argument kinds.
    IncompatibleInitializer,
    /// The matching constructor ran and failed.
    InitializationError,
    /// The referenced entity name was never declared.
    InvalidEntity,
    /// The entity lacks connectors or the named connector.
    IncompatibleEntity,
    /// A name was declared twice under [`RedeclarationPolicy::Reject`](crate::config::RedeclarationPolicy::Reject).
    DuplicateName,
}

impl LoadErrorKind {
    /// Stable machine-readable code, e.g. `ldl::invalid_class`.
    pub fn code(&self) -> &'static str {
        match self {
            LoadErrorKind::InvalidClass => "ldl::invalid_class",
            LoadErrorKind::IncompatibleClass => "ldl::incompatible_class",
            LoadErrorKind::IncompatibleInitializer => "ldl::incompatible_initializer",
            LoadErrorKind::InitializationError => "ldl::initialization_error",
            LoadErrorKind::InvalidEntity => "ldl::invalid_entity",
            LoadErrorKind::IncompatibleEntity => "ldl::incompatible_entity",
            LoadErrorKind::DuplicateName => "ldl::duplicate_name",
        }
    }

    /// Short label for the offending source location.
    pub fn description(&self) -> &'static str {
        match self {
            LoadErrorKind::InvalidClass => "unknown class",
            LoadErrorKind::IncompatibleClass => "not an entity class",
            LoadErrorKind::IncompatibleInitializer => "no matching constructor",
            LoadErrorKind::InitializationError => "constructor failed",
            LoadErrorKind::InvalidEntity => "unknown entity",
            LoadErrorKind::IncompatibleEntity => "missing connector",
            LoadErrorKind::DuplicateName => "already declared",
        }
    }
}

impl fmt::Display for LoadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A semantic failure while executing level statements.
///
/// `location` is the span of the offending name or statement in the level
/// source. Constructor failures keep the constructor's error as the
/// [`source`](std::error::Error::source).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct LevelLoadError {
    kind: LoadErrorKind,
    location: Span,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl LevelLoadError {
    pub fn new(kind: LoadErrorKind, location: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            location,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause.
    pub fn with_source(mut self, source: BoxError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn kind(&self) -> LoadErrorKind {
        self.kind
    }

    pub fn location(&self) -> Span {
        self.location
    }

    /// Byte offset of the failing location.
    pub fn offset(&self) -> usize {
        self.location.start()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
