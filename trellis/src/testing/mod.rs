//! Test support shared by unit and end-to-end tests.

pub mod fixtures;

use crate::query::engine::MatchEngine;
use crate::query::orchestrator::{QueryContext, QueryResult, run_query};
use crate::query::error::QueryError;
use crate::store::MemoryStore;
use crate::types::QueryForm;

/// Parse `query` and run it against `store` with the reference engine.
pub fn run_json(store: &MemoryStore, query: &serde_json::Value) -> Result<QueryResult, QueryError> {
    #[allow(clippy::expect_used)]
    let form = QueryForm::from_json(query).expect("query should parse");
    let engine = MatchEngine::new(store);
    run_query(&QueryContext::new(store, &engine), &form)
}
