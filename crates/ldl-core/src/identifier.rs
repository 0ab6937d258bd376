//! Identifiers for level names, aliases, connectors and class names.
//!
//! This module provides the [`Id`] type. Identifiers are plain shared strings:
//! there is no process-wide interner, so nothing outlives a single load.

use std::{borrow::Borrow, fmt, sync::Arc};

/// Separator between the segments of a dotted class name.
pub const SEGMENT_SEPARATOR: char = '.';

/// A cheaply clonable identifier.
///
/// An `Id` holds either a single identifier (`e1`, `Block`) or a dotted name
/// (`game.blocks.Block`) built with [`Id::create_nested`].
///
/// # Examples
///
/// ```
/// use ldl_core::identifier::Id;
///
/// let package = Id::new("game");
/// let class = package.create_nested(&Id::new("Block"));
/// assert_eq!(class, "game.Block");
/// assert_eq!(class.segments().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(Arc<str>);

impl Id {
    /// Creates an `Id` from a string slice.
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// Creates a dotted `Id` by appending `child` to this identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use ldl_core::identifier::Id;
    ///
    /// let nested = Id::new("rails").create_nested(&Id::new("Straight"));
    /// assert_eq!(nested, "rails.Straight");
    /// ```
    pub fn create_nested(&self, child: &Id) -> Self {
        let nested = format!("{}{SEGMENT_SEPARATOR}{}", self.0, child.0);
        Self(Arc::from(nested))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when this identifier is a dotted name.
    pub fn is_dotted(&self) -> bool {
        self.0.contains(SEGMENT_SEPARATOR)
    }

    /// Iterates over the dot-separated segments of the identifier.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEGMENT_SEPARATOR)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Id {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl Borrow<str> for Id {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}
