//! Registered fast paths.

use serde_json::json;

use crate::query::{
    EngineError, FastPathTable, MatchEngine, Pattern, PatternElement, QueryContext, Row, run_query,
};
use crate::store::{MemoryStore, TripleIndex};
use crate::testing::fixtures::social_store;
use crate::types::{AttributeId, QueryForm};

fn run(store: &MemoryStore, table: &FastPathTable, query: &serde_json::Value) -> serde_json::Value {
    let form = QueryForm::from_json(query).unwrap();
    let engine = MatchEngine::new(store);
    let ctx = QueryContext::new(store, &engine).with_fast_paths(table);
    serde_json::to_value(run_query(&ctx, &form).unwrap()).unwrap()
}

#[test]
fn test_top_level_fast_path() {
    let store = social_store();
    let mut table = FastPathTable::new();
    table.register(
        "users",
        0,
        |_: &str, _: Option<&Pattern>| -> Result<Vec<Row>, EngineError> {
            Ok(vec![Row::new("u2", 20)])
        },
    );

    let result = run(&store, &table, &json!({ "users": {}, "posts": { "$": { "limit": 1 } } }));

    assert_eq!(result["data"]["users"][0]["id"], json!("u2"));
    assert_eq!(result["data"]["users"].as_array().unwrap().len(), 1);
    // Other shapes still use the engine.
    assert_eq!(result["data"]["posts"][0]["id"], json!("p1"));
}

/// A child fast path sees the join pattern binding it to its parent.
#[test]
fn test_child_fast_path_receives_join() {
    let store = social_store();
    let index = social_store();
    let mut table = FastPathTable::new();
    table.register(
        "posts",
        1,
        move |_: &str, join: Option<&Pattern>| -> Result<Vec<Row>, EngineError> {
            let parent = match join.map(|j| &j.entity) {
                Some(PatternElement::Entity(id)) => id.clone(),
                _ => return Err(EngineError::FastPath("expected a bound parent".to_owned())),
            };
            Ok(index
                .triples(&parent, &AttributeId::from("users-posts"))
                .into_iter()
                .filter_map(|t| t.value.as_entity_id().map(|id| Row::new(id, t.time)))
                .collect())
        },
    );

    let result = run(&store, &table, &json!({ "users": { "posts": {} } }));

    let users = result["data"]["users"].as_array().unwrap();
    assert_eq!(users[0]["posts"].as_array().unwrap().len(), 2);
    assert_eq!(users[1]["posts"][0]["id"], json!("p3"));
    assert_eq!(users[2]["posts"], json!([]));
}

#[test]
fn test_fast_path_failure_aborts() {
    let store = social_store();
    let mut table = FastPathTable::new();
    table.register(
        "users",
        0,
        |_: &str, _: Option<&Pattern>| -> Result<Vec<Row>, EngineError> {
            Err(EngineError::FastPath("offline".to_owned()))
        },
    );

    let form = QueryForm::from_json(&json!({ "users": {} })).unwrap();
    let engine = MatchEngine::new(&store);
    let ctx = QueryContext::new(&store, &engine).with_fast_paths(&table);

    assert!(run_query(&ctx, &form).is_err());
}
