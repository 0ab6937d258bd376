//! The statement AST produced by [`crate::parse`].
//!
//! Every name carries its own [`Span`] so the loader can point diagnostics at
//! the exact token. Equality ignores spans.

use glam::DVec3;
use ldl_core::{identifier::Id, literal::Literal};

use crate::span::{Span, Spanned};

/// One parsed instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `using <alias> as <class>`
    Alias {
        alias: Spanned<Id>,
        class: Spanned<Id>,
    },
    /// `let <name> be <class>(<args>)`
    Declaration {
        name: Spanned<Id>,
        class: Spanned<Id>,
        args: Vec<Spanned<Literal>>,
    },
    /// `position <name> at <vector> [from <relative_to>]`
    Position {
        name: Spanned<Id>,
        position: Spanned<DVec3>,
        relative_to: Option<Spanned<Id>>,
    },
    /// `connect <moved>.<moved_connector> to <base>.<base_connector>`
    Connection {
        moved: Spanned<Id>,
        moved_connector: Spanned<Id>,
        base: Spanned<Id>,
        base_connector: Spanned<Id>,
    },
}

/// Discriminant of a [`Statement`], one per statement keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Alias,
    Declaration,
    Position,
    Connection,
}

impl StatementKind {
    /// The keyword that opens a block of this kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            StatementKind::Alias => "using",
            StatementKind::Declaration => "let",
            StatementKind::Position => "position",
            StatementKind::Connection => "connect",
        }
    }
}

fn unspanned<T>(value: T) -> Spanned<T> {
    Spanned::new(value, Span::default())
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        match self {
            Statement::Alias { .. } => StatementKind::Alias,
            Statement::Declaration { .. } => StatementKind::Declaration,
            Statement::Position { .. } => StatementKind::Position,
            Statement::Connection { .. } => StatementKind::Connection,
        }
    }

    // Constructors for synthetic statements. All spans are empty at offset 0.

    pub fn alias(alias: &str, class: &str) -> Self {
        Statement::Alias {
            alias: unspanned(Id::new(alias)),
            class: unspanned(Id::new(class)),
        }
    }

    pub fn declaration(name: &str, class: &str, args: impl IntoIterator<Item = Literal>) -> Self {
        Statement::Declaration {
            name: unspanned(Id::new(name)),
            class: unspanned(Id::new(class)),
            args: args.into_iter().map(unspanned).collect(),
        }
    }

    pub fn position(name: &str, position: DVec3, relative_to: Option<&str>) -> Self {
        Statement::Position {
            name: unspanned(Id::new(name)),
            position: unspanned(position),
            relative_to: relative_to.map(|other| unspanned(Id::new(other))),
        }
    }

    pub fn connection(moved: &str, moved_connector: &str, base: &str, base_connector: &str) -> Self {
        Statement::Connection {
            moved: unspanned(Id::new(moved)),
            moved_connector: unspanned(Id::new(moved_connector)),
            base: unspanned(Id::new(base)),
            base_connector: unspanned(Id::new(base_connector)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_keyword() {
        assert_eq!(Statement::alias("X", "a.B").kind(), StatementKind::Alias);
        assert_eq!(
            Statement::declaration("e", "X", []).kind().keyword(),
            "let"
        );
        assert_eq!(
            Statement::position("e", DVec3::ZERO, None).kind().keyword(),
            "position"
        );
        assert_eq!(
            Statement::connection("a", "b", "c", "d").kind().keyword(),
            "connect"
        );
    }

    #[test]
    fn test_equality_ignores_spans() {
        let spanned = Statement::Alias {
            alias: Spanned::new(Id::new("X"), Span::new(6..7)),
            class: Spanned::new(Id::new("a.B"), Span::new(11..14)),
        };
        assert_eq!(spanned, Statement::alias("X", "a.B"));
        assert_ne!(spanned, Statement::alias("Y", "a.B"));
    }
}
