//! Paginated namespaces and page info.

use std::collections::BTreeMap;

use serde_json::json;

use crate::query::{MatchEngine, QueryContext, run_query};
use crate::store::MemoryStore;
use crate::testing::fixtures::social_store;
use crate::types::{PageInfo, QueryForm};

fn query_with_page_info(
    store: &MemoryStore,
    query: &serde_json::Value,
    page_info: &serde_json::Value,
) -> serde_json::Value {
    let form = QueryForm::from_json(query).unwrap();
    let page_info: BTreeMap<String, PageInfo> = serde_json::from_value(page_info.clone()).unwrap();
    let engine = MatchEngine::new(store);
    let ctx = QueryContext::new(store, &engine).with_page_info(&page_info);
    serde_json::to_value(run_query(&ctx, &form).unwrap()).unwrap()
}

#[test]
fn test_offset_without_cursor_waits() {
    let store = social_store();

    for options in [
        json!({ "offset": 1 }),
        json!({ "after": ["u1", "users-id", "u1", 10] }),
        json!({ "before": ["u3", "users-id", "u3", 30] }),
    ] {
        let result = query_with_page_info(
            &store,
            &json!({ "users": { "$": options } }),
            &json!({}),
        );
        assert_eq!(result["data"]["users"], json!([]));
    }
}

#[test]
fn test_offset_with_cursor_starts_at_cursor() {
    let store = social_store();

    let result = query_with_page_info(
        &store,
        &json!({ "users": { "$": { "offset": 1, "limit": 1 } } }),
        &json!({ "users": { "start-cursor": ["u2", "users-id", "u2", 20] } }),
    );

    assert_eq!(result["data"]["users"], json!([{ "id": "u2", "name": "Ann", "email": "ann@example.com" }]));
}

#[test]
fn test_descending_page_starts_at_cursor() {
    let store = social_store();

    let result = query_with_page_info(
        &store,
        &json!({ "posts": { "$": { "after": ["p3", "posts-id", "p3", 60], "order": { "serverCreatedAt": "desc" } } } }),
        &json!({ "posts": { "start-cursor": ["p2", "posts-id", "p2", 50] } }),
    );

    let ids: Vec<_> = result["data"]["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["p2", "p1"]);
}

#[test]
fn test_false_after_is_not_pagination() {
    let store = social_store();

    let result = query_with_page_info(
        &store,
        &json!({ "users": { "$": { "after": false } } }),
        &json!({}),
    );

    assert_eq!(result["data"]["users"].as_array().unwrap().len(), 3);
}

#[test]
fn test_page_info_envelope() {
    let store = social_store();

    let result = query_with_page_info(
        &store,
        &json!({ "users": { "$": { "limit": 2 } } }),
        &json!({
            "users": {
                "start-cursor": ["u1", "users-id", "u1", 10],
                "end-cursor": ["u2", "users-id", "u2", 20],
                "has-next-page?": true,
                "has-previous-page?": false
            }
        }),
    );

    assert_eq!(
        result["pageInfo"],
        json!({
            "users": {
                "startCursor": ["u1", "users-id", "u1", 10],
                "endCursor": ["u2", "users-id", "u2", 20],
                "hasNextPage": true,
                "hasPreviousPage": false
            }
        })
    );
    assert_eq!(result["data"]["users"].as_array().unwrap().len(), 2);
}
