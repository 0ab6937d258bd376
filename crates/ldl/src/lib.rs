//! LDL - the Level Description Language loader.
//!
//! Reads level files, parses them into statements and executes the statements
//! against a [`ConstructibleRegistry`] to produce a [`Level`]: the declared
//! entities, in declaration order, with their final transforms.
//!
//! Three failure channels are kept apart. I/O failures, syntax errors from
//! [`ldl_parser`] and semantic [`LevelLoadError`]s are distinct variants of
//! [`LdlError`].

pub mod config;
pub mod factory;

mod error;
mod executor;
mod level;

pub use ldl_core::{entity, geometry, identifier, literal, registry};
pub use ldl_parser::{ParseError, Span, Spanned, Statement, StatementKind, printer};

pub use error::{LdlError, LevelLoadError, LoadErrorKind};
pub use level::{Level, PlacedEntity};

use std::{fs, path::Path};

use log::{debug, info, trace};

use config::LoaderConfig;
use executor::Executor;
use registry::ConstructibleRegistry;

/// Loads levels against an entity registry.
///
/// A loader holds only a shared registry reference and its configuration;
/// every load starts from empty alias and name tables.
///
/// # Examples
///
/// ```rust
/// use glam::DMat4;
/// use ldl::{LevelLoader, entity::Entity, registry::{EntityClass, Registry}};
///
/// #[derive(Debug, Default)]
/// struct Crate {
///     transform: DMat4,
/// }
///
/// impl Entity for Crate {
///     fn transform(&self) -> DMat4 {
///         self.transform
///     }
///
///     fn set_transform(&mut self, transform: DMat4) {
///         self.transform = transform;
///     }
/// }
///
/// let registry = Registry::new().with(
///     EntityClass::new("props.Crate").constructor([], |_| Ok(Box::new(Crate::default()))),
/// );
///
/// let loader = LevelLoader::new(&registry);
/// let level = loader
///     .load_level_str("using Crate as props.Crate\nlet c be Crate()\nposition c at (1, 2, 3)")
///     .expect("Failed to load level");
///
/// assert_eq!(level.len(), 1);
/// assert_eq!(level.find("c").unwrap().translation(), glam::DVec3::new(1.0, 2.0, 3.0));
/// ```
pub struct LevelLoader<'r> {
    registry: &'r dyn ConstructibleRegistry,
    config: LoaderConfig,
}

impl<'r> LevelLoader<'r> {
    /// Create a loader with the default configuration.
    pub fn new(registry: &'r dyn ConstructibleRegistry) -> Self {
        Self::with_config(registry, LoaderConfig::default())
    }

    /// Create a loader with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `registry` - Classes that `let` statements may construct
    /// * `config` - Statement execution settings
    pub fn with_config(registry: &'r dyn ConstructibleRegistry, config: LoaderConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Read, parse and execute the level file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LdlError::Io`] if the file cannot be read,
    /// [`LdlError::Syntax`] if it does not parse and [`LdlError::Load`] if a
    /// statement fails.
    pub fn load_level(&self, path: impl AsRef<Path>) -> Result<Level, LdlError> {
        let source = read_source(path.as_ref())?;
        self.load_level_str(&source)
    }

    /// Parse and execute level source text.
    ///
    /// # Errors
    ///
    /// Returns [`LdlError::Syntax`] or [`LdlError::Load`].
    pub fn load_level_str(&self, source: &str) -> Result<Level, LdlError> {
        let statements = parse_source(source)?;
        self.run_statements(&statements)
            .map_err(|err| LdlError::new_load_error(err, source))
    }

    /// Read and parse the level file at `path` without executing it.
    ///
    /// # Errors
    ///
    /// Returns [`LdlError::Io`] or [`LdlError::Syntax`].
    pub fn load_level_statements(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Vec<Spanned<Statement>>, LdlError> {
        let source = read_source(path.as_ref())?;
        parse_source(&source)
    }

    /// Execute already parsed statements.
    ///
    /// The first failing statement aborts the run and only its error is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns the [`LevelLoadError`] of the first failing statement.
    pub fn run_statements(&self, statements: &[Spanned<Statement>]) -> Result<Level, LevelLoadError> {
        let level = Executor::new(self.registry, &self.config).run(statements)?;

        debug!(entities = level.len(); "Level built");
        trace!(level:?; "Built level");
        Ok(level)
    }
}

fn read_source(path: &Path) -> Result<String, LdlError> {
    info!(path = path.display().to_string(); "Reading level");
    Ok(fs::read_to_string(path)?)
}

fn parse_source(source: &str) -> Result<Vec<Spanned<Statement>>, LdlError> {
    info!("Parsing level");

    let statements =
        ldl_parser::parse(source).map_err(|err| LdlError::new_syntax_error(err, source))?;

    debug!(statements = statements.len(); "Level parsed successfully");
    Ok(statements)
}
