//! `$not` conditions.
//!
//! A negated condition matches every entity whose value differs, including
//! entities that have no value at all.

use serde_json::json;

use crate::e2e_tests::helpers::{ids, query};
use crate::testing::fixtures::social_store;

/// Setup:
/// - u1: email=joe@example.com
/// - u2: email=ann@example.com
/// - u3: no email
///
/// Query: users where email != joe@example.com
/// Expected: u2 and u3
#[test]
fn test_not_includes_missing_values() {
    let store = social_store();

    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "email": { "$not": "joe@example.com" } } } } }),
    );

    assert_eq!(ids(&result, "users"), vec!["u2", "u3"]);
}

#[test]
fn test_not_through_a_relationship() {
    let store = social_store();

    // Only u1 has a profile, and its role is "admin".
    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "profile.role.name": { "$not": "admin" } } } } }),
    );

    assert_eq!(ids(&result, "users"), vec!["u2", "u3"]);
}

#[test]
fn test_not_without_dollar_prefix() {
    let store = social_store();

    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "name": { "not": "Bob" } } } } }),
    );

    assert_eq!(ids(&result, "users"), vec!["u1", "u2"]);
}
