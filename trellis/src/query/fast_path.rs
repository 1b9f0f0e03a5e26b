//! Registered shortcuts for specific query shapes.
//!
//! A fast path answers a namespace query without the general compiler. Paths
//! are registered against the find targets `[?{etype}-{level}
//! ?time-{level}]`; when the resolver is about to query a namespace with a
//! registered shape, the fast path supplies the rows instead.

use std::collections::HashMap;
use std::fmt;

use crate::query::engine::EngineError;
use crate::query::types::{Find, Pattern, Row};
use crate::query::vars::Namer;

/// A strategy that produces rows for one find shape.
pub trait FastPath: Send + Sync {
    /// Rows for `etype`, restricted to `join` when resolving a child
    /// relationship.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows cannot be produced.
    fn rows(&self, etype: &str, join: Option<&Pattern>) -> Result<Vec<Row>, EngineError>;
}

impl<F> FastPath for F
where
    F: Fn(&str, Option<&Pattern>) -> Result<Vec<Row>, EngineError> + Send + Sync,
{
    fn rows(&self, etype: &str, join: Option<&Pattern>) -> Result<Vec<Row>, EngineError> {
        self(etype, join)
    }
}

/// Fast paths keyed by find targets.
#[derive(Default)]
pub struct FastPathTable {
    paths: HashMap<Find, Box<dyn FastPath>>,
}

impl FastPathTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The find targets a namespace query on `etype` at `level` produces.
    #[must_use]
    pub fn find_for(etype: &str, level: usize) -> Find {
        let namer = Namer::root();
        Find {
            entity: namer.var(etype, level),
            time: namer.var("time", level),
        }
    }

    /// Register `path` for queries on `etype` at `level`, replacing any
    /// previous registration.
    pub fn register(&mut self, etype: &str, level: usize, path: impl FastPath + 'static) {
        self.paths.insert(Self::find_for(etype, level), Box::new(path));
    }

    #[must_use]
    pub fn lookup(&self, find: &Find) -> Option<&dyn FastPath> {
        self.paths.get(find).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl fmt::Debug for FastPathTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.paths.keys()).finish()
    }
}
