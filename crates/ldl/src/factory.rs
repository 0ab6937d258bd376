//! Entity construction and constructor overload resolution.
//!
//! The factory holds no state of its own. Classes are looked up through a
//! [`ConstructibleRegistry`] and the first constructor whose parameter kinds
//! equal the argument kinds, position by position, is invoked.

use log::trace;

use ldl_core::{
    entity::{Connectors, Entity},
    literal::{Literal, LiteralKind, signature},
    registry::{ConstructibleRegistry, EntityClass, Lookup},
};
use ldl_parser::Span;

use crate::error::{LevelLoadError, LoadErrorKind};

/// A freshly built entity together with its connector capability.
///
/// Connectors are queried once, here, so later `connect` statements never
/// probe the entity again.
#[derive(Debug)]
pub struct Constructed {
    entity: Box<dyn Entity>,
    connectors: Option<Connectors>,
}

impl Constructed {
    fn new(entity: Box<dyn Entity>) -> Self {
        let connectors = entity.connectors();
        Self { entity, connectors }
    }

    pub fn entity(&self) -> &dyn Entity {
        self.entity.as_ref()
    }

    pub fn connectors(&self) -> Option<&Connectors> {
        self.connectors.as_ref()
    }

    pub fn into_parts(self) -> (Box<dyn Entity>, Option<Connectors>) {
        (self.entity, self.connectors)
    }
}

/// Resolve `class` to a constructible entity class.
///
/// # Errors
///
/// - [`LoadErrorKind::InvalidClass`] if the registry does not know `class`.
/// - [`LoadErrorKind::IncompatibleClass`] if it does, but not as an entity.
pub fn resolve_class<'r, R>(
    registry: &'r R,
    class: &str,
    location: Span,
) -> Result<&'r EntityClass, LevelLoadError>
where
    R: ConstructibleRegistry + ?Sized,
{
    match registry.lookup(class) {
        Lookup::Entity(entity_class) => Ok(entity_class),
        Lookup::NotFound => Err(LevelLoadError::new(
            LoadErrorKind::InvalidClass,
            location,
            format!("class `{class}` is not registered"),
        )),
        Lookup::NotConstructible => Err(LevelLoadError::new(
            LoadErrorKind::IncompatibleClass,
            location,
            format!("class `{class}` cannot be constructed as an entity"),
        )),
    }
}

/// Construct an instance of `class` from `args`.
///
/// # Errors
///
/// Besides the [`resolve_class`] failures:
///
/// - [`LoadErrorKind::IncompatibleInitializer`] if no constructor takes
///   exactly the kinds of `args`.
/// - [`LoadErrorKind::InitializationError`] if the matching constructor
///   fails. The constructor's error becomes the source and its message is
///   repeated.
pub fn construct<R>(
    registry: &R,
    class: &str,
    args: &[Literal],
    location: Span,
) -> Result<Constructed, LevelLoadError>
where
    R: ConstructibleRegistry + ?Sized,
{
    let entity_class = resolve_class(registry, class, location)?;

    let Some(constructor) = entity_class.find_constructor(args) else {
        let kinds: Vec<LiteralKind> = args.iter().map(Literal::kind).collect();
        let available: Vec<String> = entity_class
            .constructors()
            .iter()
            .map(|ctor| signature(ctor.params()))
            .collect();
        let message = if available.is_empty() {
            format!("class `{class}` has no constructors")
        } else {
            format!(
                "no constructor of `{class}` accepts {}; available: {}",
                signature(&kinds),
                available.join(", ")
            )
        };
        return Err(LevelLoadError::new(
            LoadErrorKind::IncompatibleInitializer,
            location,
            message,
        ));
    };

    trace!(class, params = signature(constructor.params()); "Invoking constructor");

    let entity = constructor.build(args).map_err(|err| {
        LevelLoadError::new(
            LoadErrorKind::InitializationError,
            location,
            format!("constructor of `{class}` failed: {err}"),
        )
        .with_source(err)
    })?;

    Ok(Constructed::new(entity))
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use glam::{DMat4, DVec3};
    use ldl_core::{
        geometry::Connector,
        registry::{EntityClass, Registry},
    };

    use super::*;

    /// Constructors tag their probes through the X translation.
    #[derive(Debug)]
    struct Probe {
        transform: DMat4,
        sockets: bool,
    }

    impl Entity for Probe {
        fn transform(&self) -> DMat4 {
            self.transform
        }

        fn set_transform(&mut self, transform: DMat4) {
            self.transform = transform;
        }

        fn connectors(&self) -> Option<Connectors> {
            self.sockets.then(|| {
                Connectors::new().with("head", Connector::from_translation(DVec3::X))
            })
        }
    }

    fn probe(tag: f64, sockets: bool) -> Box<dyn Entity> {
        Box::new(Probe {
            transform: DMat4::from_translation(DVec3::new(tag, 0.0, 0.0)),
            sockets,
        })
    }

    fn registry() -> Registry {
        Registry::new()
            .with(
                EntityClass::new("game.Rail")
                    .constructor([LiteralKind::Number], |args| {
                        match args[0].as_number() {
                            Some(length) if length > 0.0 => Ok(probe(1.0, true)),
                            _ => Err("length must be positive".into()),
                        }
                    })
                    .constructor([LiteralKind::String], |_| Ok(probe(2.0, true)))
                    .constructor([LiteralKind::Number], |_| Ok(probe(3.0, true))),
            )
            .with(EntityClass::new("game.Marker").constructor([], |_| Ok(probe(4.0, false))))
            .with(EntityClass::new("game.Abstract"))
            .with_opaque("game.Sound")
    }

    fn tag(constructed: &Constructed) -> f64 {
        constructed.entity().transform().w_axis.x
    }

    #[test]
    fn test_first_exact_match_wins() {
        let registry = registry();

        let built = construct(&registry, "game.Rail", &[Literal::Number(2.0)], Span::default())
            .unwrap();
        assert_eq!(tag(&built), 1.0);

        let built = construct(
            &registry,
            "game.Rail",
            &[Literal::String("x".into())],
            Span::default(),
        )
        .unwrap();
        assert_eq!(tag(&built), 2.0);
    }

    #[test]
    fn test_connectors_captured_at_construction() {
        let registry = registry();

        let rail = construct(&registry, "game.Rail", &[Literal::Number(1.0)], Span::default())
            .unwrap();
        assert!(rail.connectors().is_some_and(|c| c.get("head").is_some()));

        let marker = construct(&registry, "game.Marker", &[], Span::default()).unwrap();
        assert!(marker.connectors().is_none());
    }

    #[test]
    fn test_unknown_class() {
        let err = construct(&registry(), "game.Missing", &[], Span::new(3..15)).unwrap_err();

        assert_eq!(err.kind(), LoadErrorKind::InvalidClass);
        assert_eq!(err.location(), Span::new(3..15));
        assert_eq!(err.message(), "class `game.Missing` is not registered");
    }

    #[test]
    fn test_opaque_class_is_incompatible() {
        let err = construct(&registry(), "game.Sound", &[], Span::default()).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::IncompatibleClass);
    }

    #[test]
    fn test_no_coercion_between_kinds() {
        let err = construct(
            &registry(),
            "game.Rail",
            &[Literal::Vector(DVec3::ONE)],
            Span::default(),
        )
        .unwrap_err();

        assert_eq!(err.kind(), LoadErrorKind::IncompatibleInitializer);
        assert_eq!(
            err.message(),
            "no constructor of `game.Rail` accepts (vector); available: (number), (string), (number)"
        );
    }

    #[test]
    fn test_wrong_arity() {
        let err = construct(
            &registry(),
            "game.Rail",
            &[Literal::Number(1.0), Literal::Number(2.0)],
            Span::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::IncompatibleInitializer);

        let err = construct(&registry(), "game.Abstract", &[], Span::default()).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::IncompatibleInitializer);
        assert_eq!(err.message(), "class `game.Abstract` has no constructors");
    }

    #[test]
    fn test_constructor_failure_is_wrapped() {
        let err = construct(&registry(), "game.Rail", &[Literal::Number(-1.0)], Span::default())
            .unwrap_err();

        assert_eq!(err.kind(), LoadErrorKind::InitializationError);
        assert!(err.message().ends_with("length must be positive"));
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("length must be positive")
        );
    }
}
