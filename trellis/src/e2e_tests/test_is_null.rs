//! `$isNull` conditions.

use serde_json::json;

use crate::e2e_tests::helpers::{ids, query};
use crate::testing::fixtures::{entity, social_store};
use crate::types::Value;

#[test]
fn test_is_null_on_scalar() {
    let store = social_store();

    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "email": { "$isNull": true } } } } }),
    );

    assert_eq!(ids(&result, "users"), vec!["u3"]);
}

#[test]
fn test_is_not_null_on_scalar() {
    let store = social_store();

    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "email": { "$isNull": false } } } } }),
    );

    assert_eq!(ids(&result, "users"), vec!["u1", "u2"]);
}

#[test]
fn test_stored_null_counts_as_null() {
    let mut store = social_store();
    entity(&mut store, "users", "u4", 95, &[("name", "Dee")]);
    store.add("u4", "users-email", Value::Null, 99);

    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "email": { "isNull": true } } } } }),
    );

    assert_eq!(ids(&result, "users"), vec!["u3", "u4"]);
}

/// A null anywhere along a multi-hop path satisfies the condition:
/// - u1 has a profile with a role that has a name
/// - u2 and u3 have no profile at all
#[test]
fn test_is_null_along_a_path() {
    let mut store = social_store();
    // u2 gets a profile without a role.
    store.add("pr2", "profiles-id", Value::string("pr2"), 100);
    store.add("u2", "users-profile", Value::string("pr2"), 101);

    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "profile.role.name": { "$isNull": true } } } } }),
    );

    assert_eq!(ids(&result, "users"), vec!["u2", "u3"]);
}
