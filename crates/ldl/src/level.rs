//! The loaded level: placed entities in declaration order.

use std::collections::HashMap;

use glam::{DMat4, DVec3};

use ldl_core::{
    entity::{Connectors, Entity},
    geometry,
    identifier::Id,
};

/// One declared entity with the name and class it was declared with.
#[derive(Debug)]
pub struct PlacedEntity {
    name: Id,
    class: Id,
    entity: Box<dyn Entity>,
    connectors: Option<Connectors>,
}

impl PlacedEntity {
    pub(crate) fn new(
        name: Id,
        class: Id,
        entity: Box<dyn Entity>,
        connectors: Option<Connectors>,
    ) -> Self {
        Self {
            name,
            class,
            entity,
            connectors,
        }
    }

    pub fn name(&self) -> &Id {
        &self.name
    }

    /// Fully qualified class name, after alias resolution.
    pub fn class(&self) -> &Id {
        &self.class
    }

    pub fn entity(&self) -> &dyn Entity {
        self.entity.as_ref()
    }

    pub fn entity_mut(&mut self) -> &mut dyn Entity {
        self.entity.as_mut()
    }

    /// Connectors captured when the entity was constructed.
    pub fn connectors(&self) -> Option<&Connectors> {
        self.connectors.as_ref()
    }

    pub fn transform(&self) -> DMat4 {
        self.entity.transform()
    }

    pub fn translation(&self) -> DVec3 {
        geometry::translation(&self.entity.transform())
    }

    pub fn into_entity(self) -> Box<dyn Entity> {
        self.entity
    }
}

/// The result of a successful load.
///
/// Entities are kept in declaration order. A name that was declared twice
/// refers to the latest declaration; the earlier entity remains in the level.
#[derive(Debug, Default)]
pub struct Level {
    entities: Vec<PlacedEntity>,
    names: HashMap<Id, usize>,
}

impl Level {
    pub(crate) fn new(entities: Vec<PlacedEntity>, names: HashMap<Id, usize>) -> Self {
        Self { entities, names }
    }

    pub fn entities(&self) -> &[PlacedEntity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Finds the entity currently bound to `name`.
    pub fn find(&self, name: &str) -> Option<&PlacedEntity> {
        self.names.get(name).map(|&index| &self.entities[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedEntity> {
        self.entities.iter()
    }

    /// Hands the entities over to the game, in declaration order.
    pub fn into_entities(self) -> Vec<Box<dyn Entity>> {
        self.entities
            .into_iter()
            .map(PlacedEntity::into_entity)
            .collect()
    }
}

impl<'a> IntoIterator for &'a Level {
    type Item = &'a PlacedEntity;
    type IntoIter = std::slice::Iter<'a, PlacedEntity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}
