//! The basic single-namespace query.

use serde_json::json;

use crate::e2e_tests::helpers::{empty, query, single_user_store};

/// Setup: `users` with a `name` attribute and one entity, `u1`, named Joe.
///
/// Query: users where name = "Joe"
/// Expected: `u1` with its id and name
#[test]
fn test_where_literal_returns_matching_entity() {
    let store = single_user_store();

    let result = query(&store, &json!({ "users": { "$": { "where": { "name": "Joe" } } } }));

    assert_eq!(
        result,
        json!({ "data": { "users": [{ "id": "u1", "name": "Joe" }] } })
    );
}

#[test]
fn test_where_literal_without_match() {
    let store = single_user_store();

    let result = query(&store, &json!({ "users": { "$": { "where": { "name": "Ann" } } } }));

    assert_eq!(result, empty("users"));
}

#[test]
fn test_no_where_returns_every_entity() {
    let store = single_user_store();

    let result = query(&store, &json!({ "users": {} }));

    assert_eq!(
        result,
        json!({ "data": { "users": [{ "id": "u1", "name": "Joe" }] } })
    );
}

#[test]
fn test_where_on_id() {
    let store = single_user_store();

    let result = query(&store, &json!({ "users": { "$": { "where": { "id": "u1" } } } }));

    assert_eq!(result["data"]["users"][0]["name"], json!("Joe"));
}

#[test]
fn test_unknown_namespace_is_empty() {
    let store = single_user_store();

    let result = query(&store, &json!({ "teams": {} }));

    assert_eq!(result, empty("teams"));
}
