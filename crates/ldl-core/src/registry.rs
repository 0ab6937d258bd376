//! Constructible type registry.
//!
//! The level compiler never instantiates types on its own. It asks a
//! [`ConstructibleRegistry`] to resolve a class name, then picks one of the
//! class's [`Constructor`]s by exact argument kinds. [`Registry`] is the
//! in-memory implementation used by games and tests alike.

use std::{collections::HashMap, error::Error, fmt};

use log::trace;

use crate::{
    entity::Entity,
    identifier::Id,
    literal::{Literal, LiteralKind, signature},
};

/// Boxed error returned by a failing constructor.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

type BuildFn = dyn Fn(&[Literal]) -> Result<Box<dyn Entity>, BoxError> + Send + Sync;

/// One typed constructor of an entity class.
pub struct Constructor {
    params: Vec<LiteralKind>,
    build: Box<BuildFn>,
}

impl Constructor {
    pub fn new<F>(params: impl Into<Vec<LiteralKind>>, build: F) -> Self
    where
        F: Fn(&[Literal]) -> Result<Box<dyn Entity>, BoxError> + Send + Sync + 'static,
    {
        Self {
            params: params.into(),
            build: Box::new(build),
        }
    }

    pub fn params(&self) -> &[LiteralKind] {
        &self.params
    }

    /// Returns `true` when `args` has exactly the declared arity and kinds.
    pub fn accepts(&self, args: &[Literal]) -> bool {
        self.params.len() == args.len()
            && self
                .params
                .iter()
                .zip(args)
                .all(|(param, arg)| *param == arg.kind())
    }

    /// Runs the constructor. Callers check [`Constructor::accepts`] first.
    pub fn build(&self, args: &[Literal]) -> Result<Box<dyn Entity>, BoxError> {
        (self.build)(args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("params", &signature(&self.params))
            .finish_non_exhaustive()
    }
}

/// An entity class with its constructors in registration order.
#[derive(Debug)]
pub struct EntityClass {
    name: Id,
    constructors: Vec<Constructor>,
}

impl EntityClass {
    pub fn new(name: impl Into<Id>) -> Self {
        Self {
            name: name.into(),
            constructors: Vec::new(),
        }
    }

    /// Appends a constructor. Earlier constructors take precedence.
    pub fn constructor<F>(mut self, params: impl Into<Vec<LiteralKind>>, build: F) -> Self
    where
        F: Fn(&[Literal]) -> Result<Box<dyn Entity>, BoxError> + Send + Sync + 'static,
    {
        self.constructors.push(Constructor::new(params, build));
        self
    }

    pub fn name(&self) -> &Id {
        &self.name
    }

    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// Finds the first constructor whose parameter kinds equal the argument kinds.
    pub fn find_constructor(&self, args: &[Literal]) -> Option<&Constructor> {
        self.constructors.iter().find(|ctor| ctor.accepts(args))
    }
}

/// Result of resolving a class name.
#[derive(Debug)]
pub enum Lookup<'a> {
    /// Nothing is registered under the name.
    NotFound,
    /// The name is a known type that cannot be placed as an entity.
    NotConstructible,
    Entity(&'a EntityClass),
}

/// Resolves class names to constructible entity classes.
pub trait ConstructibleRegistry {
    fn lookup(&self, class: &str) -> Lookup<'_>;
}

#[derive(Debug)]
enum Entry {
    Entity(EntityClass),
    Opaque,
}

/// In-memory registry keyed by fully qualified class name.
///
/// # Examples
///
/// ```
/// use ldl_core::registry::{ConstructibleRegistry, Lookup, Registry};
///
/// let registry = Registry::new().with_opaque("game.Settings");
/// assert!(matches!(registry.lookup("game.Settings"), Lookup::NotConstructible));
/// assert!(matches!(registry.lookup("game.Missing"), Lookup::NotFound));
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<Id, Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity class, replacing any entry with the same name.
    pub fn register(&mut self, class: EntityClass) {
        trace!(class = class.name.as_str(), constructors = class.constructors.len(); "Registering entity class");
        self.entries
            .insert(class.name.clone(), Entry::Entity(class));
    }

    /// Registers a name that resolves to a type but is not an entity.
    pub fn register_opaque(&mut self, name: impl Into<Id>) {
        self.entries.insert(name.into(), Entry::Opaque);
    }

    pub fn with(mut self, class: EntityClass) -> Self {
        self.register(class);
        self
    }

    pub fn with_opaque(mut self, name: impl Into<Id>) -> Self {
        self.register_opaque(name);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ConstructibleRegistry for Registry {
    fn lookup(&self, class: &str) -> Lookup<'_> {
        match self.entries.get(class) {
            Some(Entry::Entity(class)) => Lookup::Entity(class),
            Some(Entry::Opaque) => Lookup::NotConstructible,
            None => Lookup::NotFound,
        }
    }
}

impl<R: ConstructibleRegistry + ?Sized> ConstructibleRegistry for &R {
    fn lookup(&self, class: &str) -> Lookup<'_> {
        (**self).lookup(class)
    }
}
