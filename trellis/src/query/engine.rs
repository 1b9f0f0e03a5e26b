//! Pattern execution.
//!
//! The resolver hands a compiled pattern set to an [`ExecutionEngine`] and
//! gets back `(id, time)` rows for the namespace's find variables.
//! [`MatchEngine`] is the reference engine: a nested-loop matcher over any
//! [`TripleIndex`].
//!
//! Matching starts from a single empty binding set. Each pattern extends every
//! surviving binding set with each fact it matches; a set with no match is
//! dropped. `or` groups run every branch from the same input and union the
//! results; `and` groups run their branches in sequence.

#![allow(clippy::option_if_let_else)]

use std::collections::HashSet;
use std::fmt;

use super::bindings::Bindings;
use super::types::{Clause, Datom, Find, Pattern, PatternElement, PatternGroup, Row, Variable};
use crate::store::TripleIndex;
use crate::types::{Combinator, Direction, EntityId, Triple, Value};

/// Executes compiled pattern sets.
pub trait ExecutionEngine {
    /// Evaluate `clauses` and return one row per distinct entity bound to
    /// `find.entity`, ordered by time then id in `direction`.
    ///
    /// # Errors
    ///
    /// Returns an error if a find variable is left unbound or bound to the
    /// wrong kind of datom.
    fn execute(
        &self,
        find: &Find,
        clauses: &[Clause],
        direction: Direction,
    ) -> Result<Vec<Row>, EngineError>;
}

/// Errors raised while executing a pattern set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A find variable has no binding in a matched row.
    UnboundFindVariable(Variable),
    /// A find variable is bound to a datom of the wrong kind.
    UnexpectedBinding { variable: Variable, found: String },
    /// A fast path could not produce rows.
    FastPath(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundFindVariable(v) => write!(f, "find variable {v} is unbound"),
            Self::UnexpectedBinding { variable, found } => {
                write!(f, "find variable {variable} is bound to {found}")
            }
            Self::FastPath(message) => write!(f, "fast path failed: {message}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Nested-loop pattern matcher over an index.
pub struct MatchEngine<'a, I: TripleIndex + ?Sized> {
    index: &'a I,
}

impl<'a, I: TripleIndex + ?Sized> MatchEngine<'a, I> {
    pub const fn new(index: &'a I) -> Self {
        Self { index }
    }

    fn match_clauses(&self, clauses: &[Clause], mut contexts: Vec<Bindings>) -> Vec<Bindings> {
        for clause in clauses {
            contexts = match clause {
                Clause::Pattern(pattern) => self.match_pattern_all(pattern, contexts),
                Clause::Group(group) => self.match_group(group, contexts),
            };
            if contexts.is_empty() {
                break;
            }
        }
        contexts
    }

    fn match_group(&self, group: &PatternGroup, contexts: Vec<Bindings>) -> Vec<Bindings> {
        match group.combinator {
            Combinator::Or => {
                let mut results = Vec::new();
                for ctx in contexts {
                    for branch in &group.branches {
                        results.extend(self.match_clauses(branch, vec![ctx.clone()]));
                    }
                }
                results
            }
            Combinator::And => group
                .branches
                .iter()
                .fold(contexts, |acc, branch| self.match_clauses(branch, acc)),
        }
    }

    fn match_pattern_all(&self, pattern: &Pattern, contexts: Vec<Bindings>) -> Vec<Bindings> {
        let mut new_contexts = Vec::new();
        for ctx in contexts {
            for triple in self.candidate_triples(pattern, &ctx) {
                if let Some(next) = self.try_match_triple(pattern, triple, &ctx) {
                    new_contexts.push(next);
                }
            }
        }
        new_contexts
    }

    /// Narrow the facts a pattern can match using whatever is already bound.
    fn candidate_triples(&self, pattern: &Pattern, ctx: &Bindings) -> Vec<&'a Triple> {
        if let Some(entity) = resolve_entity(&pattern.entity, ctx) {
            return self.index.triples(&entity, &pattern.attribute);
        }
        if let Some(target) = resolve_entity(&pattern.value, ctx) {
            return self.index.triples_referencing(&target, &pattern.attribute);
        }
        self.index.triples_with_attribute(&pattern.attribute)
    }

    fn try_match_triple(&self, pattern: &Pattern, triple: &Triple, ctx: &Bindings) -> Option<Bindings> {
        let mut next = ctx.clone();

        let entity_matches = match &pattern.entity {
            PatternElement::Entity(id) => *id == triple.entity,
            PatternElement::Variable(var) => next.unify(var, Datom::Entity(triple.entity.clone())),
            _ => false,
        };
        if !entity_matches {
            return None;
        }

        let value_matches = match &pattern.value {
            PatternElement::Variable(var) => next.unify(var, value_datom(&triple.value)),
            PatternElement::Entity(id) => triple.value.as_entity_id() == Some(id.as_str()),
            PatternElement::Value(v) => v.matches(&triple.value),
            PatternElement::NotValue(v) => !v.matches(&triple.value),
            PatternElement::NullCheck { attribute, is_null } => {
                self.index.has_value(&triple.entity, attribute) != *is_null
            }
        };
        if !value_matches {
            return None;
        }

        next.unify(&pattern.time, Datom::Time(triple.time))
            .then_some(next)
    }
}

impl<I: TripleIndex + ?Sized> ExecutionEngine for MatchEngine<'_, I> {
    fn execute(
        &self,
        find: &Find,
        clauses: &[Clause],
        direction: Direction,
    ) -> Result<Vec<Row>, EngineError> {
        let contexts = self.match_clauses(clauses, vec![Bindings::new()]);

        let mut rows = contexts
            .iter()
            .map(|ctx| find_row(find, ctx))
            .collect::<Result<Vec<_>, _>>()?;
        rows.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.id.cmp(&b.id)));
        if direction == Direction::Desc {
            rows.reverse();
        }

        let mut seen = HashSet::new();
        rows.retain(|row| seen.insert(row.id.clone()));
        Ok(rows)
    }
}

fn resolve_entity(element: &PatternElement, ctx: &Bindings) -> Option<EntityId> {
    match element {
        PatternElement::Entity(id) => Some(id.clone()),
        PatternElement::Variable(var) => match ctx.get(var) {
            Some(Datom::Entity(id)) => Some(id.clone()),
            _ => None,
        },
        _ => None,
    }
}

fn value_datom(value: &Value) -> Datom {
    match value {
        Value::Ref(id) => Datom::Entity(id.clone()),
        other => Datom::Value(other.clone()),
    }
}

fn find_row(find: &Find, ctx: &Bindings) -> Result<Row, EngineError> {
    let id = match ctx.get(&find.entity) {
        None => return Err(EngineError::UnboundFindVariable(find.entity.clone())),
        Some(datom) => datom
            .as_entity_id()
            .map(EntityId::from_string)
            .ok_or_else(|| EngineError::UnexpectedBinding {
                variable: find.entity.clone(),
                found: datom.to_string(),
            })?,
    };
    let time = match ctx.get(&find.time) {
        None => return Err(EngineError::UnboundFindVariable(find.time.clone())),
        Some(Datom::Time(t)) => *t,
        Some(other) => {
            return Err(EngineError::UnexpectedBinding {
                variable: find.time.clone(),
                found: other.to_string(),
            });
        }
    };
    Ok(Row { id, time })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::types::PatternGroup;
    use crate::store::MemoryStore;
    use crate::testing::fixtures::social_store;
    use crate::types::AttributeId;

    fn find(etype: &str) -> Find {
        Find {
            entity: Variable::new(format!("{etype}-0")),
            time: Variable::new("time-0"),
        }
    }

    fn default_where(etype: &str) -> Clause {
        Clause::Pattern(Pattern::new(
            PatternElement::var(format!("{etype}-0")),
            AttributeId::from(format!("{etype}-id").as_str()),
            PatternElement::var(format!("{etype}-0")),
            Variable::new("time-0"),
        ))
    }

    fn leaf(etype: &str, label: &str, value: PatternElement, wildcard: &str) -> Clause {
        Clause::Pattern(Pattern::new(
            PatternElement::var(format!("{etype}-0")),
            AttributeId::from(format!("{etype}-{label}").as_str()),
            value,
            Variable::new(wildcard),
        ))
    }

    fn ids(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_default_where_finds_every_entity() {
        let store = social_store();
        let engine = MatchEngine::new(&store);

        let rows = engine
            .execute(&find("users"), &[default_where("users")], Direction::Asc)
            .unwrap();
        assert_eq!(ids(&rows), vec!["u1", "u2", "u3"]);
        assert!(rows.windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[test]
    fn test_descending_reverses_order() {
        let store = social_store();
        let engine = MatchEngine::new(&store);

        let rows = engine
            .execute(&find("users"), &[default_where("users")], Direction::Desc)
            .unwrap();
        assert_eq!(ids(&rows), vec!["u3", "u2", "u1"]);
    }

    #[test]
    fn test_literal_match() {
        let store = social_store();
        let engine = MatchEngine::new(&store);

        let clauses = [
            leaf("users", "name", PatternElement::Value(Value::string("Joe")), "_t-0"),
            default_where("users"),
        ];
        let rows = engine.execute(&find("users"), &clauses, Direction::Asc).unwrap();
        assert_eq!(ids(&rows), vec!["u1"]);
    }

    #[test]
    fn test_not_value_excludes_only_equal_values() {
        let store = social_store();
        let engine = MatchEngine::new(&store);

        let clauses = [
            leaf("users", "name", PatternElement::NotValue(Value::string("Joe")), "_t-0"),
            default_where("users"),
        ];
        let rows = engine.execute(&find("users"), &clauses, Direction::Asc).unwrap();
        assert_eq!(ids(&rows), vec!["u2", "u3"]);
    }

    #[test]
    fn test_null_check() {
        let store = social_store();
        let engine = MatchEngine::new(&store);

        let check = |is_null| {
            let clauses = [
                leaf(
                    "users",
                    "id",
                    PatternElement::NullCheck {
                        attribute: AttributeId::from("users-email"),
                        is_null,
                    },
                    "_t-0",
                ),
                default_where("users"),
            ];
            engine.execute(&find("users"), &clauses, Direction::Asc).unwrap()
        };

        assert_eq!(ids(&check(true)), vec!["u3"]);
        assert_eq!(ids(&check(false)), vec!["u1", "u2"]);
    }

    #[test]
    fn test_or_group_unions_branches() {
        let store = social_store();
        let engine = MatchEngine::new(&store);

        let group = Clause::Group(PatternGroup {
            combinator: Combinator::Or,
            branches: vec![
                vec![leaf("users", "name", PatternElement::Value(Value::string("Joe")), "_t-0")],
                vec![leaf("users", "name", PatternElement::Value(Value::string("Ann")), "_t-1")],
            ],
            join: Variable::new("users-0"),
        });
        let rows = engine
            .execute(&find("users"), &[group, default_where("users")], Direction::Asc)
            .unwrap();
        assert_eq!(ids(&rows), vec!["u1", "u2"]);
    }

    #[test]
    fn test_and_group_intersects_branches() {
        let store = social_store();
        let engine = MatchEngine::new(&store);

        let group = Clause::Group(PatternGroup {
            combinator: Combinator::And,
            branches: vec![
                vec![leaf("users", "name", PatternElement::NotValue(Value::string("Joe")), "_t-0")],
                vec![leaf(
                    "users",
                    "email",
                    PatternElement::Value(Value::string("ann@example.com")),
                    "_t-1",
                )],
            ],
            join: Variable::new("users-0"),
        });
        let rows = engine
            .execute(&find("users"), &[group, default_where("users")], Direction::Asc)
            .unwrap();
        assert_eq!(ids(&rows), vec!["u2"]);
    }

    #[test]
    fn test_join_from_bound_parent() {
        let store = social_store();
        let engine = MatchEngine::new(&store);

        let join = Clause::Pattern(Pattern::new(
            PatternElement::entity("u1"),
            AttributeId::from("users-posts"),
            PatternElement::var("posts-1"),
            Variable::new("_t-0"),
        ));
        let find = Find {
            entity: Variable::new("posts-1"),
            time: Variable::new("time-1"),
        };
        let default = Clause::Pattern(Pattern::new(
            PatternElement::var("posts-1"),
            AttributeId::from("posts-id"),
            PatternElement::var("posts-1"),
            Variable::new("time-1"),
        ));

        let rows = engine.execute(&find, &[join, default], Direction::Asc).unwrap();
        assert_eq!(ids(&rows), vec!["p1", "p2"]);
    }

    #[test]
    fn test_reverse_join_uses_value_index() {
        let store = social_store();
        let engine = MatchEngine::new(&store);

        let join = Clause::Pattern(Pattern::new(
            PatternElement::var("users-1"),
            AttributeId::from("users-posts"),
            PatternElement::entity("p3"),
            Variable::new("_t-0"),
        ));
        let find = Find {
            entity: Variable::new("users-1"),
            time: Variable::new("time-1"),
        };
        let default = Clause::Pattern(Pattern::new(
            PatternElement::var("users-1"),
            AttributeId::from("users-id"),
            PatternElement::var("users-1"),
            Variable::new("time-1"),
        ));

        let rows = engine.execute(&find, &[join, default], Direction::Asc).unwrap();
        assert_eq!(ids(&rows), vec!["u2"]);
    }

    #[test]
    fn test_unbound_find_variable() {
        let store = social_store();
        let engine = MatchEngine::new(&store);

        let err = engine
            .execute(
                &find("users"),
                &[leaf("users", "name", PatternElement::var("name"), "_t-0")],
                Direction::Asc,
            )
            .unwrap_err();
        assert_eq!(err, EngineError::UnboundFindVariable(Variable::new("time-0")));
    }

    #[test]
    fn test_empty_store() {
        let store = MemoryStore::default();
        let engine = MatchEngine::new(&store);

        let rows = engine
            .execute(&find("users"), &[default_where("users")], Direction::Asc)
            .unwrap();
        assert!(rows.is_empty());
    }
}
