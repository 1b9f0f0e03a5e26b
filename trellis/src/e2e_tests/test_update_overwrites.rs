//! Later writes to an attribute replace earlier ones, for matching as well as
//! for the returned objects.

use serde_json::json;

use crate::e2e_tests::helpers::{empty, ids, query, single_user_store};
use crate::types::Value;

#[test]
fn test_where_ignores_overwritten_value() {
    let mut store = single_user_store();
    store.add("u1", "users-name", Value::string("Joseph"), 5);

    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "name": "Joe" } } } }),
    );
    assert_eq!(result, empty("users"));

    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "name": "Joseph" } } } }),
    );
    assert_eq!(
        result,
        json!({ "data": { "users": [{ "id": "u1", "name": "Joseph" }] } })
    );
}

#[test]
fn test_not_checks_current_value() {
    let mut store = single_user_store();
    store.add("u1", "users-name", Value::string("Joseph"), 5);

    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "name": { "$not": "Joseph" } } } } }),
    );
    assert_eq!(result, empty("users"));

    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "name": { "$not": "Joe" } } } } }),
    );
    assert_eq!(ids(&result, "users"), vec!["u1"]);
}

#[test]
fn test_null_overwrite_is_null() {
    let mut store = single_user_store();
    store.add("u1", "users-name", Value::Null, 5);

    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "name": { "$isNull": true } } } } }),
    );
    assert_eq!(
        result,
        json!({ "data": { "users": [{ "id": "u1", "name": null }] } })
    );

    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "name": { "$isNull": false } } } } }),
    );
    assert_eq!(result, empty("users"));
}

#[test]
fn test_older_write_is_ignored() {
    let mut store = single_user_store();
    store.add("u1", "users-name", Value::string("Jo"), 1);

    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "name": "Jo" } } } }),
    );
    assert_eq!(result, empty("users"));
}
