//! Repeated evaluation of the same query is byte-identical.

use serde_json::json;

use crate::testing::{fixtures::social_store, run_json};

#[test]
fn test_repeated_queries_are_identical() {
    let store = social_store();
    let query = json!({
        "users": {
            "$": { "where": { "or": [{ "name": "Joe" }, { "email": { "$isNull": true } }] } },
            "posts": { "comments": {} },
            "profile": { "role": {} }
        },
        "posts": { "$": { "order": { "serverCreatedAt": "desc" } }, "author": {} }
    });

    let first = serde_json::to_string(&run_json(&store, &query).unwrap()).unwrap();
    for _ in 0..10 {
        let again = serde_json::to_string(&run_json(&store, &query).unwrap()).unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn test_object_keys_follow_catalog_order() {
    let store = social_store();

    let result = run_json(&store, &json!({ "users": { "$": { "where": { "name": "Joe" } } } })).unwrap();

    let encoded = serde_json::to_string(&result).unwrap();
    assert_eq!(
        encoded,
        r#"{"data":{"users":[{"id":"u1","name":"Joe","email":"joe@example.com"}]}}"#
    );
}
