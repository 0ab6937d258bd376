//! The entity seam between the level compiler and the game runtime.

use std::fmt;

use glam::DMat4;
use indexmap::IndexMap;

use crate::{geometry::Connector, identifier::Id};

/// A placeable object in the world.
///
/// The compiler only reads and writes the entity-to-world transform. Connector
/// support is an optional capability, queried once when the entity is built.
pub trait Entity: fmt::Debug {
    /// Current entity-to-world transform.
    fn transform(&self) -> DMat4;

    fn set_transform(&mut self, transform: DMat4);

    /// Named attachment sockets, or `None` when the entity has no connectors.
    fn connectors(&self) -> Option<Connectors> {
        None
    }
}

/// A name to [`Connector`] map with unique keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Connectors {
    entries: IndexMap<Id, Connector>,
}

impl Connectors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connector, replacing any existing one with the same name.
    pub fn with(mut self, name: impl Into<Id>, connector: Connector) -> Self {
        self.insert(name, connector);
        self
    }

    pub fn insert(&mut self, name: impl Into<Id>, connector: Connector) -> Option<Connector> {
        self.entries.insert(name.into(), connector)
    }

    pub fn get(&self, name: &str) -> Option<&Connector> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &Id> {
        self.entries.keys()
    }
}

impl FromIterator<(Id, Connector)> for Connectors {
    fn from_iter<I: IntoIterator<Item = (Id, Connector)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[derive(Debug, Default)]
    struct Crate {
        transform: DMat4,
    }

    impl Entity for Crate {
        fn transform(&self) -> DMat4 {
            self.transform
        }

        fn set_transform(&mut self, transform: DMat4) {
            self.transform = transform;
        }
    }

    #[test]
    fn test_connectors_default_to_none() {
        let mut entity = Crate::default();
        assert!(entity.connectors().is_none());

        let moved = DMat4::from_translation(DVec3::X);
        entity.set_transform(moved);
        assert_eq!(entity.transform(), moved);
    }

    #[test]
    fn test_connectors_replace_same_name() {
        let connectors = Connectors::new()
            .with("left", Connector::from_translation(DVec3::NEG_X))
            .with("left", Connector::from_translation(DVec3::X));

        assert_eq!(connectors.len(), 1);
        assert_eq!(
            connectors.get("left"),
            Some(&Connector::from_translation(DVec3::X))
        );
        assert!(connectors.get("right").is_none());
    }
}
