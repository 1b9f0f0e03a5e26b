//! Aggregate-only namespaces.

use serde_json::json;

use crate::query::{MatchEngine, QueryContext, run_query};
use crate::testing::fixtures::social_store;
use crate::types::QueryForm;

#[test]
fn test_aggregate_namespace_is_passed_through() {
    let store = social_store();
    let engine = MatchEngine::new(&store);
    let form = QueryForm::from_json(&json!({ "users": {}, "posts": {} })).unwrap();
    let aggregate = json!({ "posts": { "count": 3 } });
    let aggregate = aggregate.as_object().unwrap();

    let result = run_query(
        &QueryContext::new(&store, &engine).with_aggregate(aggregate),
        &form,
    )
    .unwrap();
    let result = serde_json::to_value(&result).unwrap();

    assert!(result["data"].get("posts").is_none());
    assert_eq!(result["data"]["users"].as_array().unwrap().len(), 3);
    assert_eq!(result["aggregate"], json!({ "posts": { "count": 3 } }));
    assert!(result.get("pageInfo").is_none());
}

#[test]
fn test_falsy_aggregate_entry_still_resolves() {
    let store = social_store();
    let engine = MatchEngine::new(&store);
    let form = QueryForm::from_json(&json!({ "posts": {} })).unwrap();
    let aggregate = json!({ "posts": false });
    let aggregate = aggregate.as_object().unwrap();

    let result = run_query(
        &QueryContext::new(&store, &engine).with_aggregate(aggregate),
        &form,
    )
    .unwrap();

    assert_eq!(result.namespace("posts").unwrap().len(), 3);
}
