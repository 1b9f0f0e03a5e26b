//! Namespace resolution.
//!
//! Resolving one namespace at one level:
//! 1. Gate: a page past the first needs a start cursor; without one the
//!    namespace is empty until the pagination coordinator supplies it.
//! 2. Rows come from a registered fast path when one matches the find
//!    targets, otherwise from the engine on `[join] ++ where ++ default`.
//! 3. Rows before the start cursor are dropped.
//! 4. Each row is materialized through the store; rows whose entity no
//!    longer exists are skipped.
//! 5. The result is cut to the requested limit.

use crate::query::cursor;
use crate::query::engine::ExecutionEngine;
use crate::query::error::QueryError;
use crate::query::fast_path::FastPathTable;
use crate::query::path::PatternCompiler;
use crate::query::types::{Clause, Pattern};
use crate::query::vars::VarAllocator;
use crate::store::TripleStore;
use crate::types::{Form, PageInfo, ResolvedObjects};

/// Resolves namespaces for one query evaluation.
///
/// Owns the evaluation's variable allocator; create one per query.
pub struct Resolver<'a> {
    store: &'a dyn TripleStore,
    engine: &'a dyn ExecutionEngine,
    fast_paths: Option<&'a FastPathTable>,
    vars: VarAllocator,
}

impl<'a> Resolver<'a> {
    #[must_use]
    pub fn new(store: &'a dyn TripleStore, engine: &'a dyn ExecutionEngine) -> Self {
        Self {
            store,
            engine,
            fast_paths: None,
            vars: VarAllocator::new(),
        }
    }

    #[must_use]
    pub const fn with_fast_paths(mut self, fast_paths: Option<&'a FastPathTable>) -> Self {
        self.fast_paths = fast_paths;
        self
    }

    pub(crate) const fn store(&self) -> &'a dyn TripleStore {
        self.store
    }

    pub(crate) fn compiler(&self) -> PatternCompiler<'_> {
        PatternCompiler::new(self.store, &self.vars)
    }

    /// Resolve the entities of `etype` at `level` selected by `form`.
    ///
    /// `join` restricts the namespace to entities related to a parent.
    ///
    /// # Errors
    ///
    /// `AttrNotFound` if the where-clause names a missing attribute; `NotARef`
    /// or engine errors abort the query.
    pub fn resolve(
        &self,
        etype: &str,
        level: usize,
        form: &Form,
        join: Option<&Pattern>,
        page_info: Option<&PageInfo>,
    ) -> Result<ResolvedObjects, QueryError> {
        let config = &form.config;
        let start_cursor = page_info.and_then(|p| p.start_cursor.as_ref());
        if config.needs_start_cursor() && start_cursor.is_none() {
            tracing::debug!("No start cursor for paginated {etype}, waiting on page info");
            return Ok(ResolvedObjects::new());
        }

        let direction = config.direction();
        let find = FastPathTable::find_for(etype, level);

        let mut rows = if let Some(path) = self.fast_paths.and_then(|t| t.lookup(&find)) {
            tracing::debug!("Resolving {etype} at level {level} through fast path");
            path.rows(etype, join)?
        } else {
            let mut clauses: Vec<Clause> = join.cloned().map(Clause::Pattern).into_iter().collect();
            clauses.extend(
                self.compiler()
                    .make_where(etype, level, config.where_clause.as_ref())?,
            );
            self.engine.execute(&find, &clauses, direction)?
        };

        if let Some(start) = start_cursor {
            cursor::anchor(&mut rows, start, direction);
        }

        let mut objects = ResolvedObjects::new();
        for row in rows {
            if let Some(object) = self.store.object(etype, &row.id) {
                objects.insert(row.id, object);
            }
        }
        if let Some(limit) = config.limit {
            objects.truncate(limit);
        }

        Ok(objects)
    }

    /// Like [`Resolver::resolve`], but a missing attribute yields no entities.
    ///
    /// # Errors
    ///
    /// Only non-recoverable errors are returned.
    pub fn resolve_guarded(
        &self,
        etype: &str,
        level: usize,
        form: &Form,
        join: Option<&Pattern>,
        page_info: Option<&PageInfo>,
    ) -> Result<ResolvedObjects, QueryError> {
        match self.resolve(etype, level, form, join, page_info) {
            Err(e) if e.is_recoverable() => {
                tracing::debug!("Resolving {etype} as empty: {e}");
                Ok(ResolvedObjects::new())
            }
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::query::engine::{EngineError, MatchEngine};
    use crate::query::types::Row;
    use crate::testing::fixtures::social_store;
    use crate::types::{Cursor, EntityId};

    fn form(json: &serde_json::Value) -> Form {
        Form::from_json(json).unwrap()
    }

    fn ids(objects: &ResolvedObjects) -> Vec<&str> {
        objects.ids().map(EntityId::as_str).collect()
    }

    fn page_info(entity: &str, time: u64) -> PageInfo {
        PageInfo {
            start_cursor: Some(Cursor {
                entity: EntityId::from(entity),
                attribute: "users-id".into(),
                value: json!(entity),
                time,
            }),
            ..PageInfo::default()
        }
    }

    #[test]
    fn test_resolve_all() {
        let store = social_store();
        let engine = MatchEngine::new(&store);
        let resolver = Resolver::new(&store, &engine);

        let users = resolver
            .resolve("users", 0, &form(&json!({})), None, None)
            .unwrap();
        assert_eq!(ids(&users), vec!["u1", "u2", "u3"]);
        assert_eq!(
            users.get(&EntityId::from("u1")).unwrap().attribute("name"),
            Some(&json!("Joe"))
        );
    }

    #[test]
    fn test_limit_is_a_prefix() {
        let store = social_store();
        let engine = MatchEngine::new(&store);
        let resolver = Resolver::new(&store, &engine);

        let all = resolver
            .resolve("users", 0, &form(&json!({ "$": { "order": { "serverCreatedAt": "desc" } } })), None, None)
            .unwrap();
        let limited = resolver
            .resolve(
                "users",
                0,
                &form(&json!({ "$": { "limit": 2, "order": { "serverCreatedAt": "desc" } } })),
                None,
                None,
            )
            .unwrap();
        assert_eq!(ids(&limited), ids(&all)[..2].to_vec());
        assert_eq!(ids(&limited), vec!["u3", "u2"]);
    }

    #[test]
    fn test_pagination_gate() {
        let store = social_store();
        let engine = MatchEngine::new(&store);
        let resolver = Resolver::new(&store, &engine);
        let paged = form(&json!({ "$": { "offset": 10 } }));

        let gated = resolver.resolve("users", 0, &paged, None, None).unwrap();
        assert!(gated.is_empty());

        let info = page_info("u2", 20);
        let anchored = resolver
            .resolve("users", 0, &paged, None, Some(&info))
            .unwrap();
        assert_eq!(ids(&anchored), vec!["u2", "u3"]);
    }

    #[test]
    fn test_missing_attribute_is_recovered() {
        let store = social_store();
        let engine = MatchEngine::new(&store);
        let resolver = Resolver::new(&store, &engine);
        let form = form(&json!({ "$": { "where": { "noSuchField": "x" } } }));

        assert!(resolver.resolve("users", 0, &form, None, None).is_err());
        let users = resolver
            .resolve_guarded("users", 0, &form, None, None)
            .unwrap();
        assert!(users.is_empty());
    }

    #[test]
    fn test_not_a_ref_is_fatal() {
        let store = social_store();
        let engine = MatchEngine::new(&store);
        let resolver = Resolver::new(&store, &engine);
        let form = form(&json!({ "$": { "where": { "name.first": "x" } } }));

        let err = resolver
            .resolve_guarded("users", 0, &form, None, None)
            .unwrap_err();
        assert!(matches!(err, QueryError::NotARef { .. }));
    }

    #[test]
    fn test_fast_path_bypasses_compiler() {
        let store = social_store();
        let engine = MatchEngine::new(&store);
        let mut table = FastPathTable::new();
        table.register(
            "users",
            0,
            |_: &str, _: Option<&Pattern>| -> Result<Vec<Row>, EngineError> {
                Ok(vec![Row::new("u3", 30), Row::new("gone", 31)])
            },
        );
        let resolver = Resolver::new(&store, &engine).with_fast_paths(Some(&table));

        // The where-clause would fail compilation if it were compiled.
        let form = form(&json!({ "$": { "where": { "name.first": "x" } } }));
        let users = resolver.resolve("users", 0, &form, None, None).unwrap();
        assert_eq!(ids(&users), vec!["u3"]);
    }
}
