//! Compiled query types.
//!
//! This module defines the symbolic form a where-clause compiles to:
//! - `PatternElement` - a position in a pattern (variable, id, literal, ...)
//! - `Pattern` - an (entity, attribute, value, time) quad
//! - `Clause` - a pattern or an `or`/`and` group of pattern sets
//! - `Find` - the variables a namespace query returns
//! - `Row` - one `(id, time)` result from the execution engine
//! - `Datom` - a value bound to a variable while matching

use std::fmt;

pub use crate::query::vars::Variable;
pub use crate::types::{AttributeId, Combinator, EntityId, Time, Value};

/// A datom is any piece of data a variable can be bound to.
#[derive(Debug, Clone, PartialEq)]
pub enum Datom {
    /// An entity ID.
    Entity(EntityId),
    /// A stored value.
    Value(Value),
    /// The time a fact was written.
    Time(Time),
}

impl Datom {
    /// The entity this datom names, if any.
    #[must_use]
    pub fn as_entity_id(&self) -> Option<&str> {
        match self {
            Self::Entity(id) => Some(id.as_str()),
            Self::Value(v) => v.as_entity_id(),
            Self::Time(_) => None,
        }
    }
}

impl fmt::Display for Datom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity(id) => write!(f, "#{id}"),
            Self::Value(v) => write!(f, "{v}"),
            Self::Time(t) => write!(f, "@{t}"),
        }
    }
}

/// A pattern element - either a concrete value or a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternElement {
    /// A variable to be bound.
    Variable(Variable),
    /// A concrete entity ID.
    Entity(EntityId),
    /// A literal the stored value must equal.
    Value(Value),
    /// A literal the stored value must differ from.
    NotValue(Value),
    /// Matches when the entity lacks (`is_null`) or has (`!is_null`) a
    /// non-null value for `attribute`.
    NullCheck {
        attribute: AttributeId,
        is_null: bool,
    },
}

impl PatternElement {
    /// Create a variable pattern element.
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Self::Variable(Variable::new(name))
    }

    /// Create an entity pattern element.
    #[must_use]
    pub fn entity(s: &str) -> Self {
        Self::Entity(EntityId::from_string(s))
    }

    /// Get the variable if this is one.
    #[must_use]
    pub const fn as_variable(&self) -> Option<&Variable> {
        match self {
            Self::Variable(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for PatternElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(v) => write!(f, "{v}"),
            Self::Entity(id) => write!(f, "#{id}"),
            Self::Value(v) => write!(f, "{v}"),
            Self::NotValue(v) => write!(f, "(not {v})"),
            Self::NullCheck { attribute, is_null } => {
                write!(f, "(is-null :{attribute} {is_null})")
            }
        }
    }
}

/// A query pattern: an (entity, attribute, value, time) quad.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    /// The entity position (variable or bound id).
    pub entity: PatternElement,
    /// The attribute is always concrete.
    pub attribute: AttributeId,
    /// The value position.
    pub value: PatternElement,
    /// The time position (named variable or wildcard).
    pub time: Variable,
}

impl Pattern {
    /// Create a new pattern.
    #[must_use]
    pub const fn new(
        entity: PatternElement,
        attribute: AttributeId,
        value: PatternElement,
        time: Variable,
    ) -> Self {
        Self {
            entity,
            attribute,
            value,
            time,
        }
    }

    /// Replace every occurrence of `variable` with the concrete `id`.
    #[must_use]
    pub fn bind(mut self, variable: &Variable, id: &EntityId) -> Self {
        for element in [&mut self.entity, &mut self.value] {
            if element.as_variable() == Some(variable) {
                *element = PatternElement::Entity(id.clone());
            }
        }
        self
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} :{} {} {}]",
            self.entity, self.attribute, self.value, self.time
        )
    }
}

/// Branches of a boolean combinator that share the namespace's entity.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternGroup {
    pub combinator: Combinator,
    pub branches: Vec<Vec<Clause>>,
    /// The variable every branch binds to the same entity.
    pub join: Variable,
}

/// One element of a compiled pattern set.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Pattern(Pattern),
    Group(PatternGroup),
}

impl Clause {
    #[must_use]
    pub const fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            Self::Pattern(p) => Some(p),
            Self::Group(_) => None,
        }
    }

    #[must_use]
    pub const fn as_group(&self) -> Option<&PatternGroup> {
        match self {
            Self::Pattern(_) => None,
            Self::Group(g) => Some(g),
        }
    }
}

impl From<Pattern> for Clause {
    fn from(pattern: Pattern) -> Self {
        Self::Pattern(pattern)
    }
}

/// The variables a namespace query returns: its entity and that entity's time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Find {
    pub entity: Variable,
    pub time: Variable,
}

impl fmt::Display for Find {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}]", self.entity, self.time)
    }
}

/// One result of executing a pattern set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: EntityId,
    pub time: Time,
}

impl Row {
    #[must_use]
    pub fn new(id: &str, time: Time) -> Self {
        Self {
            id: EntityId::from_string(id),
            time,
        }
    }
}
