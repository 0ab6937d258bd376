//! Statement execution.
//!
//! Statements run strictly in order as a left fold over a [`Session`]. Each
//! step consumes the session and returns it updated, or stops the fold with
//! the first [`LevelLoadError`]. The session only becomes a [`Level`] after
//! the last statement succeeded.

use std::collections::HashMap;

use glam::DVec3;
use log::{debug, info, trace, warn};

use ldl_core::{
    geometry::{self, Connector},
    identifier::Id,
    literal::Literal,
    registry::ConstructibleRegistry,
};
use ldl_parser::{Spanned, Statement};

use crate::{
    config::{LoaderConfig, RedeclarationPolicy},
    error::{LevelLoadError, LoadErrorKind},
    factory,
    level::{Level, PlacedEntity},
};

/// Tables built up while running one statement list.
#[derive(Debug, Default)]
struct Session {
    /// Alias to fully qualified class name; later aliases overwrite.
    aliases: HashMap<Id, Id>,
    /// Entity name to index into `entities`.
    names: HashMap<Id, usize>,
    entities: Vec<PlacedEntity>,
}

impl Session {
    fn lookup(&self, name: &Spanned<Id>) -> Result<usize, LevelLoadError> {
        self.names.get(name.inner()).copied().ok_or_else(|| {
            LevelLoadError::new(
                LoadErrorKind::InvalidEntity,
                name.span(),
                format!("unknown entity `{}`", name.inner()),
            )
        })
    }

    fn connector(
        &self,
        index: usize,
        entity: &Spanned<Id>,
        connector: &Spanned<Id>,
    ) -> Result<Connector, LevelLoadError> {
        let Some(connectors) = self.entities[index].connectors() else {
            return Err(LevelLoadError::new(
                LoadErrorKind::IncompatibleEntity,
                entity.span(),
                format!("entity `{}` has no connectors", entity.inner()),
            ));
        };

        connectors.get(connector.as_str()).copied().ok_or_else(|| {
            LevelLoadError::new(
                LoadErrorKind::IncompatibleEntity,
                connector.span(),
                format!(
                    "entity `{}` has no connector named `{}`",
                    entity.inner(),
                    connector.inner()
                ),
            )
        })
    }

    fn into_level(self) -> Level {
        Level::new(self.entities, self.names)
    }
}

/// Runs statements against a registry.
pub(crate) struct Executor<'a, R: ?Sized> {
    registry: &'a R,
    config: &'a LoaderConfig,
}

impl<'a, R> Executor<'a, R>
where
    R: ConstructibleRegistry + ?Sized,
{
    pub fn new(registry: &'a R, config: &'a LoaderConfig) -> Self {
        Self { registry, config }
    }

    /// Execute every statement, returning the level only if all succeed.
    pub fn run(&self, statements: &[Spanned<Statement>]) -> Result<Level, LevelLoadError> {
        info!(statements = statements.len(); "Executing level statements");

        let session = statements
            .iter()
            .try_fold(Session::default(), |session, statement| {
                self.step(session, statement)
            })?;

        info!(
            entities = session.entities.len(),
            names = session.names.len(),
            aliases = session.aliases.len();
            "Level executed"
        );
        Ok(session.into_level())
    }

    fn step(
        &self,
        session: Session,
        statement: &Spanned<Statement>,
    ) -> Result<Session, LevelLoadError> {
        trace!(
            kind = statement.kind().keyword(),
            location = statement.location();
            "Executing statement"
        );

        match statement.inner() {
            Statement::Alias { alias, class } => self.alias(session, alias, class),
            Statement::Declaration { name, class, args } => {
                self.declare(session, statement, name, class, args)
            }
            Statement::Position {
                name,
                position,
                relative_to,
            } => Self::position(session, name, **position, relative_to.as_ref()),
            Statement::Connection {
                moved,
                moved_connector,
                base,
                base_connector,
            } => Self::connect(session, moved, moved_connector, base, base_connector),
        }
    }

    fn alias(
        &self,
        mut session: Session,
        alias: &Spanned<Id>,
        class: &Spanned<Id>,
    ) -> Result<Session, LevelLoadError> {
        factory::resolve_class(self.registry, class.as_str(), class.span())?;

        if let Some(previous) = session
            .aliases
            .insert(alias.inner().clone(), class.inner().clone())
        {
            debug!(alias = alias.as_str(), previous = previous.as_str(), class = class.as_str(); "Alias redefined");
        } else {
            debug!(alias = alias.as_str(), class = class.as_str(); "Alias defined");
        }
        Ok(session)
    }

    fn declare(
        &self,
        mut session: Session,
        statement: &Spanned<Statement>,
        name: &Spanned<Id>,
        class: &Spanned<Id>,
        args: &[Spanned<Literal>],
    ) -> Result<Session, LevelLoadError> {
        if session.names.contains_key(name.inner()) {
            match self.config.redeclaration() {
                RedeclarationPolicy::Reject => {
                    return Err(LevelLoadError::new(
                        LoadErrorKind::DuplicateName,
                        name.span(),
                        format!("entity `{}` is already declared", name.inner()),
                    ));
                }
                RedeclarationPolicy::Allow => {
                    warn!(name = name.as_str(), location = name.location(); "Entity name rebound; the earlier entity stays in the level");
                }
            }
        }

        let class_name = session
            .aliases
            .get(class.inner())
            .cloned()
            .unwrap_or_else(|| class.inner().clone());
        let args: Vec<Literal> = args.iter().map(|arg| arg.inner().clone()).collect();

        let constructed =
            factory::construct(self.registry, class_name.as_str(), &args, statement.span())?;
        let (entity, connectors) = constructed.into_parts();

        debug!(
            name = name.as_str(),
            class = class_name.as_str(),
            connectors = connectors.as_ref().map_or(0, |c| c.len());
            "Constructed entity"
        );

        let index = session.entities.len();
        session.entities.push(PlacedEntity::new(
            name.inner().clone(),
            class_name,
            entity,
            connectors,
        ));
        session.names.insert(name.inner().clone(), index);
        Ok(session)
    }

    fn position(
        mut session: Session,
        name: &Spanned<Id>,
        position: DVec3,
        relative_to: Option<&Spanned<Id>>,
    ) -> Result<Session, LevelLoadError> {
        let index = session.lookup(name)?;

        let target = match relative_to {
            Some(other) => {
                let other_index = session.lookup(other)?;
                position + session.entities[other_index].translation()
            }
            None => position,
        };

        let entity = session.entities[index].entity_mut();
        let transform = geometry::with_translation(&entity.transform(), target);
        entity.set_transform(transform);

        trace!(name = name.as_str(), translation:? = target; "Positioned entity");
        Ok(session)
    }

    fn connect(
        mut session: Session,
        moved: &Spanned<Id>,
        moved_connector: &Spanned<Id>,
        base: &Spanned<Id>,
        base_connector: &Spanned<Id>,
    ) -> Result<Session, LevelLoadError> {
        let moved_index = session.lookup(moved)?;
        let base_index = session.lookup(base)?;

        let moved_socket = session.connector(moved_index, moved, moved_connector)?;
        let base_socket = session.connector(base_index, base, base_connector)?;

        let base_world = session.entities[base_index].transform();
        let world = geometry::mated_transform(&base_world, &base_socket, &moved_socket);
        session.entities[moved_index].entity_mut().set_transform(world);

        trace!(
            moved = moved.as_str(),
            base = base.as_str(),
            translation:? = geometry::translation(&world);
            "Connected entities"
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use glam::DMat4;
    use ldl_core::{
        entity::{Connectors, Entity},
        literal::LiteralKind,
        registry::{BoxError, EntityClass, Registry},
    };

    use super::*;

    #[derive(Debug, Default)]
    struct Block {
        transform: DMat4,
    }

    impl Entity for Block {
        fn transform(&self) -> DMat4 {
            self.transform
        }

        fn set_transform(&mut self, transform: DMat4) {
            self.transform = transform;
        }
    }

    #[derive(Debug, Default)]
    struct Rail {
        transform: DMat4,
        length: f64,
    }

    impl Entity for Rail {
        fn transform(&self) -> DMat4 {
            self.transform
        }

        fn set_transform(&mut self, transform: DMat4) {
            self.transform = transform;
        }

        fn connectors(&self) -> Option<Connectors> {
            let half = self.length / 2.0;
            Some(
                Connectors::new()
                    .with("tail", Connector::from_translation(DVec3::new(-half, 0.0, 0.0)))
                    .with("head", Connector::from_translation(DVec3::new(half, 0.0, 0.0))),
            )
        }
    }

    fn block(_: &[Literal]) -> Result<Box<dyn Entity>, BoxError> {
        Ok(Box::new(Block::default()))
    }

    fn rail(args: &[Literal]) -> Result<Box<dyn Entity>, BoxError> {
        let length = args[0].as_number().ok_or("length must be a number")?;
        Ok(Box::new(Rail {
            transform: DMat4::IDENTITY,
            length,
        }))
    }

    fn registry() -> Registry {
        Registry::new()
            .with(EntityClass::new("game.Block").constructor([], block))
            .with(EntityClass::new("game.Rail").constructor([LiteralKind::Number], rail))
    }

    fn run(
        config: &LoaderConfig,
        statements: Vec<Statement>,
    ) -> Result<Level, LevelLoadError> {
        let statements: Vec<_> = statements
            .into_iter()
            .map(|statement| Spanned::new(statement, Default::default()))
            .collect();
        Executor::new(&registry(), config).run(&statements)
    }

    #[test]
    fn test_empty_program_builds_empty_level() {
        let level = run(&LoaderConfig::default(), Vec::new()).unwrap();
        assert!(level.is_empty());
    }

    #[test]
    fn test_alias_to_unknown_class_fails_immediately() {
        let err = run(
            &LoaderConfig::default(),
            vec![Statement::alias("B", "game.Nope")],
        )
        .unwrap_err();

        assert_eq!(err.kind(), LoadErrorKind::InvalidClass);
    }

    #[test]
    fn test_declaration_uses_class_verbatim_without_alias() {
        let level = run(
            &LoaderConfig::default(),
            vec![
                Statement::alias("Block", "game.Rail"),
                Statement::declaration("a", "game.Block", []),
                Statement::declaration("b", "Block", [Literal::Number(1.0)]),
            ],
        )
        .unwrap();

        let classes: Vec<_> = level.iter().map(|e| e.class().as_str()).collect();
        assert_eq!(classes, vec!["game.Block", "game.Rail"]);
    }

    #[test]
    fn test_redeclaration_allowed_rebinds_name() {
        let level = run(
            &LoaderConfig::default(),
            vec![
                Statement::declaration("a", "game.Block", []),
                Statement::position("a", DVec3::ONE, None),
                Statement::declaration("a", "game.Block", []),
            ],
        )
        .unwrap();

        assert_eq!(level.len(), 2);
        assert_eq!(level.entities()[0].translation(), DVec3::ONE);
        assert_eq!(level.find("a").map(|e| e.translation()), Some(DVec3::ZERO));
    }

    #[test]
    fn test_redeclaration_rejected() {
        let config = LoaderConfig::new(RedeclarationPolicy::Reject);
        let err = run(
            &config,
            vec![
                Statement::declaration("a", "game.Block", []),
                Statement::declaration("a", "game.Block", []),
            ],
        )
        .unwrap_err();

        assert_eq!(err.kind(), LoadErrorKind::DuplicateName);
        assert_eq!(err.message(), "entity `a` is already declared");
    }

    #[test]
    fn test_position_keeps_rotation() {
        let level = run(
            &LoaderConfig::default(),
            vec![
                Statement::declaration("r1", "game.Rail", [Literal::Number(2.0)]),
                Statement::declaration("r2", "game.Rail", [Literal::Number(2.0)]),
                Statement::connection("r2", "tail", "r1", "tail"),
                Statement::position("r2", DVec3::new(5.0, 0.0, 0.0), None),
            ],
        )
        .unwrap();

        let r2 = level.find("r2").unwrap().transform();
        assert_eq!(r2.w_axis.truncate(), DVec3::new(5.0, 0.0, 0.0));
        assert_eq!(r2.y_axis.truncate(), DVec3::NEG_Y);
        assert_eq!(r2.z_axis.truncate(), DVec3::NEG_Z);
    }

    #[test]
    fn test_connection_reads_base_at_execution_time() {
        let level = run(
            &LoaderConfig::default(),
            vec![
                Statement::declaration("r1", "game.Rail", [Literal::Number(2.0)]),
                Statement::declaration("r2", "game.Rail", [Literal::Number(2.0)]),
                Statement::connection("r2", "tail", "r1", "head"),
                Statement::position("r1", DVec3::new(0.0, 10.0, 0.0), None),
            ],
        )
        .unwrap();

        assert_eq!(
            level.find("r2").unwrap().translation(),
            DVec3::new(2.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_entity_without_connectors() {
        let err = run(
            &LoaderConfig::default(),
            vec![
                Statement::declaration("b", "game.Block", []),
                Statement::declaration("r", "game.Rail", [Literal::Number(1.0)]),
                Statement::connection("r", "tail", "b", "top"),
            ],
        )
        .unwrap_err();

        assert_eq!(err.kind(), LoadErrorKind::IncompatibleEntity);
        assert_eq!(err.message(), "entity `b` has no connectors");
    }

    #[test]
    fn test_unknown_relative_entity() {
        let err = run(
            &LoaderConfig::default(),
            vec![
                Statement::declaration("b", "game.Block", []),
                Statement::position("b", DVec3::ZERO, Some("ghost")),
            ],
        )
        .unwrap_err();

        assert_eq!(err.kind(), LoadErrorKind::InvalidEntity);
        assert_eq!(err.message(), "unknown entity `ghost`");
    }
}
