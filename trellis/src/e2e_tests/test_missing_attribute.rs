//! Queries naming attributes the catalog does not have yet.

use serde_json::json;

use crate::e2e_tests::helpers::{empty, query, single_user_store};
use crate::testing::fixtures::social_store;

#[test]
fn test_unknown_where_field_yields_empty_namespace() {
    let store = single_user_store();

    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "noSuchField": "x" } } } }),
    );

    assert_eq!(result, empty("users"));
}

#[test]
fn test_unknown_hop_yields_empty_namespace() {
    let store = social_store();

    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "followers.name": "x" } } } }),
    );

    assert_eq!(result, empty("users"));
}

#[test]
fn test_unknown_child_label_yields_empty_list() {
    let store = social_store();

    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "name": "Joe" } }, "followers": {} } }),
    );

    assert_eq!(result["data"]["users"][0]["followers"], json!([]));
}

#[test]
fn test_other_namespaces_are_unaffected() {
    let store = social_store();

    let result = query(
        &store,
        &json!({
            "users": { "$": { "where": { "noSuchField": "x" } } },
            "posts": { "$": { "where": { "title": "Hello" } } }
        }),
    );

    assert_eq!(result["data"]["users"], json!([]));
    assert_eq!(result["data"]["posts"][0]["id"], json!("p1"));
}
