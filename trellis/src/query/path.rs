//! Path and pattern compilation.
//!
//! A where-clause key like `posts.comments.author.name` is a chain of
//! relationship hops (`posts`, `comments`, `author`) ending in a leaf
//! attribute (`name`). Each hop binds the current level's entity variable to
//! the next level's through the relationship attribute; the leaf constrains
//! the last entity's value.

use crate::query::error::QueryError;
use crate::query::types::{Pattern, PatternElement};
use crate::query::vars::{Namer, VarAllocator};
use crate::store::TripleStore;
use crate::types::{AttributeId, Condition, EntityId};

/// Which side of the relationship the traversal starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopDirection {
    /// The label is the attribute's forward identity: current entity is the
    /// triple's subject.
    Forward,
    /// The label is the attribute's reverse identity: current entity is the
    /// triple's value.
    Reverse,
}

/// One resolved relationship hop.
#[derive(Debug, Clone, PartialEq)]
pub struct Hop {
    pub next_etype: String,
    pub next_level: usize,
    pub pattern: Pattern,
    pub attr_id: AttributeId,
    pub direction: HopDirection,
}

/// Compiles paths and where-clauses into patterns against a store's catalog.
pub struct PatternCompiler<'a> {
    store: &'a dyn TripleStore,
    vars: &'a VarAllocator,
}

impl<'a> PatternCompiler<'a> {
    pub const fn new(store: &'a dyn TripleStore, vars: &'a VarAllocator) -> Self {
        Self { store, vars }
    }

    pub(crate) const fn store(&self) -> &'a dyn TripleStore {
        self.store
    }

    /// Resolve the relationship `label` on `etype` at `level`.
    ///
    /// # Errors
    ///
    /// `AttrNotFound` if `etype` has no relationship called `label`;
    /// `NotARef` if the attribute found is a scalar.
    pub fn resolve_hop(
        &self,
        namer: &Namer,
        etype: &str,
        level: usize,
        label: &str,
    ) -> Result<Hop, QueryError> {
        let (attr, direction) = match self.store.attr_by_forward_label(etype, label) {
            Some(attr) => (attr, HopDirection::Forward),
            None => (
                self.store
                    .attr_by_reverse_label(etype, label)
                    .ok_or_else(|| QueryError::attr_not_found(etype, label))?,
                HopDirection::Reverse,
            ),
        };

        let not_a_ref = || QueryError::NotARef {
            attr_id: attr.id.clone(),
        };
        if !attr.is_ref() {
            return Err(not_a_ref());
        }
        let rev = attr.reverse_identity.as_ref().ok_or_else(not_a_ref)?;

        let fwd_etype = attr.forward_identity.etype.as_str();
        let rev_etype = rev.etype.as_str();
        let next_level = level + 1;

        let (subject, object, next_etype) = match direction {
            HopDirection::Forward => (
                namer.var(fwd_etype, level),
                namer.var(rev_etype, next_level),
                rev_etype,
            ),
            HopDirection::Reverse => (
                namer.var(fwd_etype, next_level),
                namer.var(rev_etype, level),
                fwd_etype,
            ),
        };

        Ok(Hop {
            next_etype: next_etype.to_owned(),
            next_level,
            pattern: Pattern::new(
                PatternElement::Variable(subject),
                attr.id.clone(),
                PatternElement::Variable(object),
                self.vars.wildcard("time"),
            ),
            attr_id: attr.id.clone(),
            direction,
        })
    }

    /// Constrain the value attribute `label` of the entity at `level`.
    ///
    /// # Errors
    ///
    /// `AttrNotFound` if `etype` has no attribute `label`, or if a null check
    /// is requested and `etype` has no primary key. Leaves are looked up by
    /// forward label only, so a reverse label as leaf is `AttrNotFound` too.
    pub fn resolve_leaf(
        &self,
        namer: &Namer,
        etype: &str,
        level: usize,
        label: &str,
        condition: &Condition,
    ) -> Result<Pattern, QueryError> {
        let attr = self
            .store
            .attr_by_forward_label(etype, label)
            .ok_or_else(|| QueryError::attr_not_found(etype, label))?;
        let entity = PatternElement::Variable(namer.var(etype, level));

        let pattern = match condition {
            Condition::IsNull(is_null) => {
                let id_attr = self
                    .store
                    .primary_key_attr(etype)
                    .ok_or_else(|| QueryError::attr_not_found(etype, "id"))?;
                Pattern::new(
                    entity,
                    id_attr.id.clone(),
                    PatternElement::NullCheck {
                        attribute: attr.id.clone(),
                        is_null: *is_null,
                    },
                    self.vars.wildcard("time"),
                )
            }
            Condition::Literal(v) => Pattern::new(
                entity,
                attr.id.clone(),
                PatternElement::Value(v.clone()),
                self.vars.wildcard("time"),
            ),
            Condition::Not(v) => Pattern::new(
                entity,
                attr.id.clone(),
                PatternElement::NotValue(v.clone()),
                self.vars.wildcard("time"),
            ),
        };

        Ok(pattern)
    }

    /// Compile `path` (hops then leaf) with `condition` on the leaf.
    pub fn compile_path(
        &self,
        namer: &Namer,
        etype: &str,
        level: usize,
        path: &[String],
        condition: &Condition,
    ) -> Result<Vec<Pattern>, QueryError> {
        let Some((leaf, hops)) = path.split_last() else {
            return Err(QueryError::attr_not_found(etype, ""));
        };

        let mut patterns = Vec::with_capacity(path.len());
        let mut current_etype = etype.to_owned();
        let mut current_level = level;
        for label in hops {
            let hop = self.resolve_hop(namer, &current_etype, current_level, label)?;
            patterns.push(hop.pattern);
            current_etype = hop.next_etype;
            current_level = hop.next_level;
        }

        patterns.push(self.resolve_leaf(namer, &current_etype, current_level, leaf, condition)?);
        Ok(patterns)
    }

    /// The hop from a concrete parent entity through `label`.
    ///
    /// The parent's level variable is replaced with `parent`, so the pattern
    /// only matches entities related to that parent.
    pub fn make_join(
        &self,
        etype: &str,
        level: usize,
        label: &str,
        parent: &EntityId,
    ) -> Result<Hop, QueryError> {
        let namer = Namer::root();
        let hop = self.resolve_hop(&namer, etype, level, label)?;
        let pattern = hop.pattern.bind(&namer.var(etype, level), parent);
        Ok(Hop { pattern, ..hop })
    }
}
