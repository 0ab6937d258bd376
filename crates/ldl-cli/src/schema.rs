//! Probe registry built from the configured class schema.
//!
//! `ldl check` has no access to the game's entity types. Each configured class
//! is registered with constructors that build a [`ProbeEntity`]: an entity
//! with only a transform and the declared connectors, enough to execute every
//! statement of a level.

use glam::{DMat4, DVec3};
use log::debug;

use ldl::{
    entity::{Connectors, Entity},
    geometry::Connector,
    registry::{EntityClass, Registry},
};

use crate::config::ClassSchema;

/// A stand-in entity that records its transform.
#[derive(Debug, Clone)]
pub struct ProbeEntity {
    transform: DMat4,
    connectors: Option<Connectors>,
}

impl Entity for ProbeEntity {
    fn transform(&self) -> DMat4 {
        self.transform
    }

    fn set_transform(&mut self, transform: DMat4) {
        self.transform = transform;
    }

    fn connectors(&self) -> Option<Connectors> {
        self.connectors.clone()
    }
}

/// Build a registry with one probe class per schema entry.
pub fn probe_registry(classes: &[ClassSchema]) -> Registry {
    let mut registry = Registry::new();

    for schema in classes {
        if schema.opaque() {
            registry.register_opaque(schema.name());
            continue;
        }

        let connectors = schema.connectors().map(|sockets| {
            sockets
                .iter()
                .map(|socket| {
                    (
                        socket.name().into(),
                        Connector::from_translation(DVec3::from_array(socket.translation())),
                    )
                })
                .collect::<Connectors>()
        });
        let probe = ProbeEntity {
            transform: DMat4::IDENTITY,
            connectors,
        };

        let class = schema
            .constructors()
            .iter()
            .fold(EntityClass::new(schema.name()), |class, params| {
                let probe = probe.clone();
                class.constructor(params.clone(), move |_| {
                    Ok(Box::new(probe.clone()) as Box<dyn Entity>)
                })
            });

        debug!(class = schema.name(), constructors = schema.constructors().len(); "Registered probe class");
        registry.register(class);
    }

    registry
}

#[cfg(test)]
mod tests {
    use ldl::{
        literal::Literal,
        registry::{ConstructibleRegistry, Lookup},
    };

    use super::*;

    fn schema(toml_source: &str) -> Vec<ClassSchema> {
        #[derive(serde::Deserialize)]
        struct Classes {
            classes: Vec<ClassSchema>,
        }
        toml::from_str::<Classes>(toml_source).unwrap().classes
    }

    #[test]
    fn test_probe_classes_follow_schema() {
        let registry = probe_registry(&schema(
            r#"
            [[classes]]
            name = "game.Rail"
            constructors = [["number"], []]
            connectors = [{ name = "head", translation = [1.0, 0.0, 0.0] }]

            [[classes]]
            name = "game.Block"
            constructors = [[]]

            [[classes]]
            name = "game.Music"
            opaque = true
            "#,
        ));

        let Lookup::Entity(rail) = registry.lookup("game.Rail") else {
            panic!("rail should be constructible");
        };
        assert_eq!(rail.constructors().len(), 2);

        let entity = rail
            .find_constructor(&[Literal::Number(2.0)])
            .unwrap()
            .build(&[Literal::Number(2.0)])
            .unwrap();
        let connectors = entity.connectors().unwrap();
        assert_eq!(
            connectors.get("head").map(|c| c.offset().w_axis.truncate()),
            Some(DVec3::X)
        );

        let Lookup::Entity(block) = registry.lookup("game.Block") else {
            panic!("block should be constructible");
        };
        let block = block.find_constructor(&[]).unwrap().build(&[]).unwrap();
        assert!(block.connectors().is_none());

        assert!(matches!(
            registry.lookup("game.Music"),
            Lookup::NotConstructible
        ));
        assert!(matches!(registry.lookup("game.Other"), Lookup::NotFound));
    }

    #[test]
    fn test_class_without_constructors() {
        let registry = probe_registry(&schema(
            r#"
            [[classes]]
            name = "game.Abstract"
            "#,
        ));

        let Lookup::Entity(class) = registry.lookup("game.Abstract") else {
            panic!("class should be registered");
        };
        assert!(class.find_constructor(&[]).is_none());
        assert!(class.constructors().is_empty());
    }
}
