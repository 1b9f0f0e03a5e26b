//! Pattern variables.
//!
//! Two kinds of variables appear in compiled patterns:
//! - named variables, `?{name}-{level}`, which must unify wherever they are
//!   repeated (joins between hops, the namespace's entity, its time);
//! - wildcards, `?_{name}-{n}`, which are unique per allocation and only
//!   assert that some binding exists.
//!
//! Inside an `or`/`and` branch every named variable except the namespace's
//! own entity variable is suffixed with the branch index, so alternatives
//! never unify with each other by accident.

use std::cell::Cell;
use std::fmt;

/// A query variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    /// The variable name, without the leading `?`.
    pub name: String,
}

impl Variable {
    /// Create a new variable.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}

/// Hands out wildcard variables for one query evaluation.
///
/// The counter only guarantees distinctness within the evaluation that owns
/// the allocator; it is never shared or reset.
#[derive(Debug, Default)]
pub struct VarAllocator {
    seed: Cell<u64>,
}

impl VarAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh variable tagged with `name` whose binding nobody reads.
    pub fn wildcard(&self, name: &str) -> Variable {
        let n = self.seed.get();
        self.seed.set(n + 1);
        Variable::new(format!("_{name}-{n}"))
    }

    /// Number of wildcards handed out so far.
    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.seed.get()
    }
}

/// Naming scope for named variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Namer {
    /// The `(etype, level)` variable shared by every branch.
    shared: Option<(String, usize)>,
    suffix: String,
}

impl Namer {
    /// The scope of a namespace root, outside any branch.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// The deterministic variable for `name` at `level` in this scope.
    #[must_use]
    pub fn var(&self, name: &str, level: usize) -> Variable {
        let shared = self
            .shared
            .as_ref()
            .is_some_and(|(etype, l)| etype == name && *l == level);
        if shared || self.suffix.is_empty() {
            Variable::new(format!("{name}-{level}"))
        } else {
            Variable::new(format!("{name}-{level}{}", self.suffix))
        }
    }

    /// The scope of branch `index` of a combinator on `etype` at `level`.
    #[must_use]
    pub fn branch(&self, etype: &str, level: usize, index: usize) -> Self {
        Self {
            shared: Some((etype.to_owned(), level)),
            suffix: format!("{}-{index}", self.suffix),
        }
    }
}
