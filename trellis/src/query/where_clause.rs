//! Where-clause compilation.
//!
//! Entries compile in order into clauses:
//! - `or`/`and` become one group whose branches are compiled in their own
//!   naming scope, joined on the namespace's entity variable;
//! - `{"$not": v}` becomes `or(path != v, path is null at any prefix)`, so
//!   entities missing the attribute (or any hop to it) also match;
//! - `{"$isNull": true}` on a multi-hop path becomes `or(null at any prefix)`;
//! - anything else compiles straight to the path's patterns.
//!
//! Null prefixes end on a leaf, which must be a forward label. A `$not` or
//! multi-hop `$isNull` whose path starts with a reverse label therefore fails
//! with `AttrNotFound`, and the namespace resolves empty.
//!
//! Every compiled where-clause is followed by the default pattern, which binds
//! the namespace's entity and time variables through the primary key.

use crate::query::error::QueryError;
use crate::query::path::PatternCompiler;
use crate::query::types::{Clause, Pattern, PatternElement, PatternGroup};
use crate::query::vars::Namer;
use crate::types::{Combinator, Condition, WhereClause, WhereEntry};

impl PatternCompiler<'_> {
    /// Compile a where-clause for `etype` at `level` in the scope of `namer`.
    pub fn compile_where(
        &self,
        namer: &Namer,
        etype: &str,
        level: usize,
        clause: &WhereClause,
    ) -> Result<Vec<Clause>, QueryError> {
        let mut clauses = Vec::new();

        for entry in &clause.entries {
            match entry {
                WhereEntry::Group {
                    combinator,
                    branches,
                } => {
                    let branches = branches
                        .iter()
                        .enumerate()
                        .map(|(i, branch)| {
                            self.compile_where(&namer.branch(etype, level, i), etype, level, branch)
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    clauses.push(group(*combinator, branches, namer, etype, level));
                }
                WhereEntry::Path {
                    path,
                    condition: condition @ Condition::Not(_),
                } => {
                    let mut branches = vec![into_clauses(
                        self.compile_path(namer, etype, level, path, condition)?,
                    )];
                    branches.extend(self.null_prefixes(namer, etype, level, path)?);
                    clauses.push(group(Combinator::Or, branches, namer, etype, level));
                }
                WhereEntry::Path {
                    path,
                    condition: Condition::IsNull(true),
                } if path.len() > 1 => {
                    let branches = self.null_prefixes(namer, etype, level, path)?;
                    clauses.push(group(Combinator::Or, branches, namer, etype, level));
                }
                WhereEntry::Path { path, condition } => {
                    clauses.extend(into_clauses(
                        self.compile_path(namer, etype, level, path, condition)?,
                    ));
                }
            }
        }

        Ok(clauses)
    }

    /// One null-check pattern set per non-empty prefix of `path`.
    fn null_prefixes(
        &self,
        namer: &Namer,
        etype: &str,
        level: usize,
        path: &[String],
    ) -> Result<Vec<Vec<Clause>>, QueryError> {
        (1..=path.len())
            .map(|n| {
                self.compile_path(namer, etype, level, &path[..n], &Condition::IsNull(true))
                    .map(into_clauses)
            })
            .collect()
    }

    /// `[?etype-level :pk ?etype-level ?time-level]`.
    pub fn default_where(&self, etype: &str, level: usize) -> Result<Clause, QueryError> {
        let namer = Namer::root();
        let pk = self
            .store()
            .primary_key_attr(etype)
            .ok_or_else(|| QueryError::attr_not_found(etype, "id"))?;
        let entity = namer.var(etype, level);

        Ok(Clause::Pattern(Pattern::new(
            PatternElement::Variable(entity.clone()),
            pk.id.clone(),
            PatternElement::Variable(entity),
            namer.var("time", level),
        )))
    }

    /// The compiled where-clause (if any) followed by the default pattern.
    pub fn make_where(
        &self,
        etype: &str,
        level: usize,
        where_clause: Option<&WhereClause>,
    ) -> Result<Vec<Clause>, QueryError> {
        let mut clauses = match where_clause {
            Some(clause) => self.compile_where(&Namer::root(), etype, level, clause)?,
            None => Vec::new(),
        };
        clauses.push(self.default_where(etype, level)?);
        Ok(clauses)
    }
}

fn into_clauses(patterns: Vec<Pattern>) -> Vec<Clause> {
    patterns.into_iter().map(Clause::Pattern).collect()
}

fn group(
    combinator: Combinator,
    branches: Vec<Vec<Clause>>,
    namer: &Namer,
    etype: &str,
    level: usize,
) -> Clause {
    Clause::Group(PatternGroup {
        combinator,
        branches,
        join: namer.var(etype, level),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::query::types::Variable;
    use crate::query::vars::VarAllocator;
    use crate::testing::fixtures::social_store;
    use crate::types::{AttributeId, Value};

    fn compile(etype: &str, where_json: &serde_json::Value) -> Result<Vec<Clause>, QueryError> {
        let store = social_store();
        let vars = VarAllocator::new();
        let compiler = PatternCompiler::new(&store, &vars);
        let clause = WhereClause::from_json(where_json).unwrap();
        compiler.make_where(etype, 0, Some(&clause))
    }

    fn patterns(clauses: &[Clause]) -> Vec<&Pattern> {
        clauses.iter().filter_map(Clause::as_pattern).collect()
    }

    #[test]
    fn test_default_where_only() {
        let store = social_store();
        let vars = VarAllocator::new();
        let compiler = PatternCompiler::new(&store, &vars);

        let clauses = compiler.make_where("users", 0, None).unwrap();
        assert_eq!(clauses.len(), 1);
        assert_eq!(
            clauses[0].to_owned(),
            Clause::Pattern(Pattern::new(
                PatternElement::var("users-0"),
                AttributeId::from("users-id"),
                PatternElement::var("users-0"),
                Variable::new("time-0"),
            ))
        );
        assert_eq!(vars.allocated(), 0);
    }

    #[test]
    fn test_literal_then_default() {
        let clauses = compile("users", &json!({ "name": "Joe" })).unwrap();
        let patterns = patterns(&clauses);
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].attribute.as_str(), "users-name");
        assert_eq!(patterns[0].value, PatternElement::Value(Value::string("Joe")));
        assert_eq!(patterns[1].attribute.as_str(), "users-id");
    }

    #[test]
    fn test_branch_isolation() {
        let clauses = compile(
            "users",
            &json!({ "or": [{ "posts.title": "a" }, { "posts.title": "b" }] }),
        )
        .unwrap();

        let group = clauses[0].as_group().unwrap();
        assert_eq!(group.combinator, Combinator::Or);
        assert_eq!(group.join, Variable::new("users-0"));
        assert_eq!(group.branches.len(), 2);

        let first = group.branches[0][0].as_pattern().unwrap();
        let second = group.branches[1][0].as_pattern().unwrap();
        // Both branches start from the shared entity...
        assert_eq!(first.entity, PatternElement::var("users-0"));
        assert_eq!(second.entity, PatternElement::var("users-0"));
        // ...but their hop targets never unify.
        assert_ne!(first.value, second.value);
        assert_eq!(first.value, PatternElement::var("posts-1-0"));
        assert_eq!(second.value, PatternElement::var("posts-1-1"));
    }

    #[test]
    fn test_null_path_expansion() {
        let clauses = compile("users", &json!({ "profile.role.name": { "$isNull": true } })).unwrap();

        let group = clauses[0].as_group().unwrap();
        assert_eq!(group.combinator, Combinator::Or);
        assert_eq!(group.branches.len(), 3);

        let null_attrs: Vec<_> = group
            .branches
            .iter()
            .map(|branch| match &branch.last().and_then(Clause::as_pattern).unwrap().value {
                PatternElement::NullCheck { attribute, is_null } => {
                    assert!(is_null);
                    attribute.as_str().to_owned()
                }
                other => panic!("expected null check, got {other}"),
            })
            .collect();
        assert_eq!(null_attrs, vec!["users-profile", "profiles-role", "roles-name"]);
        assert_eq!(group.branches[2].len(), 3);
    }

    #[test]
    fn test_single_segment_is_null_is_a_plain_pattern() {
        let clauses = compile("users", &json!({ "email": { "$isNull": true } })).unwrap();
        assert!(clauses[0].as_pattern().is_some());
        assert_eq!(clauses.len(), 2);
    }

    #[test]
    fn test_not_includes_missing_values() {
        let clauses = compile("users", &json!({ "profile.bio": { "$not": "hi" } })).unwrap();

        let group = clauses[0].as_group().unwrap();
        assert_eq!(group.combinator, Combinator::Or);
        assert_eq!(group.branches.len(), 3);
        let leaf = group.branches[0][1].as_pattern().unwrap();
        assert_eq!(leaf.value, PatternElement::NotValue(Value::string("hi")));
        assert!(group.branches[1..].iter().all(|b| {
            matches!(
                b.last().and_then(Clause::as_pattern).map(|p| &p.value),
                Some(PatternElement::NullCheck { is_null: true, .. })
            )
        }));
    }

    #[test]
    fn test_nested_combinators() {
        let clauses = compile(
            "users",
            &json!({ "and": [{ "name": "Joe" }, { "or": [{ "email": "a" }, { "email": "b" }] }] }),
        )
        .unwrap();

        let outer = clauses[0].as_group().unwrap();
        assert_eq!(outer.combinator, Combinator::And);
        let inner = outer.branches[1][0].as_group().unwrap();
        assert_eq!(inner.combinator, Combinator::Or);
        assert_eq!(inner.join, Variable::new("users-0"));
    }

    #[test]
    fn test_missing_attribute_fails_compilation() {
        let err = compile("users", &json!({ "noSuchField": "x" })).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_scalar_hop_is_fatal() {
        let err = compile("users", &json!({ "name.first": "x" })).unwrap_err();
        assert!(!err.is_recoverable());
    }
}
