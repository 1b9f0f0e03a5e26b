//! Query entry point.
//!
//! `run_query` resolves every top-level namespace at level 0, extends the
//! results with their children and wraps them in the result envelope:
//!
//! ```json
//! { "data": { "users": [ ... ] }, "pageInfo": { ... }, "aggregate": { ... } }
//! ```
//!
//! `pageInfo` and `aggregate` appear only when the caller supplied them.
//! Namespaces the caller marks as aggregate-only are not resolved.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::query::engine::ExecutionEngine;
use crate::query::error::QueryError;
use crate::query::fast_path::FastPathTable;
use crate::query::resolver::Resolver;
use crate::store::TripleStore;
use crate::types::{FormattedPageInfo, PageInfo, QueryForm, ResolvedObject};

/// Everything a query evaluation reads besides the query itself.
#[derive(Clone, Copy)]
pub struct QueryContext<'a> {
    pub store: &'a dyn TripleStore,
    pub engine: &'a dyn ExecutionEngine,
    /// Cursor state per namespace, from the pagination coordinator.
    pub page_info: Option<&'a BTreeMap<String, PageInfo>>,
    /// Aggregate results per namespace, passed through untouched.
    pub aggregate: Option<&'a serde_json::Map<String, serde_json::Value>>,
    pub fast_paths: Option<&'a FastPathTable>,
}

impl<'a> QueryContext<'a> {
    #[must_use]
    pub fn new(store: &'a dyn TripleStore, engine: &'a dyn ExecutionEngine) -> Self {
        Self {
            store,
            engine,
            page_info: None,
            aggregate: None,
            fast_paths: None,
        }
    }

    #[must_use]
    pub const fn with_page_info(mut self, page_info: &'a BTreeMap<String, PageInfo>) -> Self {
        self.page_info = Some(page_info);
        self
    }

    #[must_use]
    pub const fn with_aggregate(
        mut self,
        aggregate: &'a serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        self.aggregate = Some(aggregate);
        self
    }

    #[must_use]
    pub const fn with_fast_paths(mut self, fast_paths: &'a FastPathTable) -> Self {
        self.fast_paths = Some(fast_paths);
        self
    }

    fn is_aggregate(&self, namespace: &str) -> bool {
        self.aggregate
            .and_then(|a| a.get(namespace))
            .is_some_and(is_truthy)
    }
}

/// The result envelope.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    /// Resolved objects per namespace, in query order.
    pub data: Vec<(String, Vec<ResolvedObject>)>,
    pub page_info: Option<BTreeMap<String, FormattedPageInfo>>,
    pub aggregate: Option<serde_json::Value>,
}

impl QueryResult {
    /// The objects resolved for `namespace`.
    #[must_use]
    pub fn namespace(&self, namespace: &str) -> Option<&[ResolvedObject]> {
        self.data
            .iter()
            .find_map(|(name, objects)| (name == namespace).then_some(objects.as_slice()))
    }
}

struct Data<'a>(&'a [(String, Vec<ResolvedObject>)]);

impl Serialize for Data<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, objects) in self.0 {
            map.serialize_entry(name, objects)?;
        }
        map.end()
    }
}

impl Serialize for QueryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + usize::from(self.page_info.is_some()) + usize::from(self.aggregate.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("data", &Data(&self.data))?;
        if let Some(page_info) = &self.page_info {
            map.serialize_entry("pageInfo", page_info)?;
        }
        if let Some(aggregate) = &self.aggregate {
            map.serialize_entry("aggregate", aggregate)?;
        }
        map.end()
    }
}

/// Evaluate `query` against the context's store.
///
/// # Errors
///
/// Returns the first non-recoverable error; missing attributes never fail a
/// query.
pub fn run_query(ctx: &QueryContext<'_>, query: &QueryForm) -> Result<QueryResult, QueryError> {
    let resolver = Resolver::new(ctx.store, ctx.engine).with_fast_paths(ctx.fast_paths);

    let mut data = Vec::with_capacity(query.namespaces.len());
    for (etype, form) in &query.namespaces {
        if ctx.is_aggregate(etype) {
            tracing::debug!("Skipping aggregate-only namespace {etype}");
            continue;
        }
        let page_info = ctx.page_info.and_then(|p| p.get(etype));
        let objects = resolver.resolve_guarded(etype, 0, form, None, page_info)?;
        data.push((etype.clone(), resolver.extend(etype, 0, form, objects)?));
    }

    Ok(QueryResult {
        data,
        page_info: ctx.page_info.map(|p| {
            p.iter()
                .map(|(name, info)| (name.clone(), FormattedPageInfo::from(info)))
                .collect()
        }),
        aggregate: ctx.aggregate.cloned().map(serde_json::Value::Object),
    })
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::query::engine::MatchEngine;
    use crate::testing::fixtures::social_store;

    #[test]
    fn test_envelope_without_extras() {
        let store = social_store();
        let engine = MatchEngine::new(&store);
        let query = QueryForm::from_json(&json!({ "users": { "$": { "where": { "name": "Joe" } } } }))
            .unwrap();

        let result = run_query(&QueryContext::new(&store, &engine), &query).unwrap();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "data": { "users": [{ "id": "u1", "name": "Joe", "email": "joe@example.com" }] } })
        );
    }

    #[test]
    fn test_aggregate_namespaces_are_skipped() {
        let store = social_store();
        let engine = MatchEngine::new(&store);
        let query = QueryForm::from_json(&json!({ "users": {}, "posts": {} })).unwrap();
        let aggregate = json!({ "posts": { "count": 3 }, "users": null });
        let aggregate = aggregate.as_object().unwrap();

        let result = run_query(
            &QueryContext::new(&store, &engine).with_aggregate(aggregate),
            &query,
        )
        .unwrap();

        assert!(result.namespace("posts").is_none());
        assert_eq!(result.namespace("users").unwrap().len(), 3);
        assert_eq!(
            serde_json::to_value(&result).unwrap()["aggregate"],
            json!({ "posts": { "count": 3 }, "users": null })
        );
    }

    #[test]
    fn test_page_info_is_reformatted() {
        let store = social_store();
        let engine = MatchEngine::new(&store);
        let query = QueryForm::from_json(&json!({ "users": { "$": { "limit": 1 } } })).unwrap();
        let page_info: BTreeMap<String, PageInfo> = serde_json::from_value(json!({
            "users": {
                "start-cursor": ["u1", "users-id", "u1", 10],
                "end-cursor": ["u1", "users-id", "u1", 10],
                "has-next-page?": true
            }
        }))
        .unwrap();

        let result = run_query(
            &QueryContext::new(&store, &engine).with_page_info(&page_info),
            &query,
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(&result).unwrap()["pageInfo"],
            json!({
                "users": {
                    "startCursor": ["u1", "users-id", "u1", 10],
                    "endCursor": ["u1", "users-id", "u1", 10],
                    "hasNextPage": true,
                    "hasPreviousPage": false
                }
            })
        );
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!(1)));
    }
}
