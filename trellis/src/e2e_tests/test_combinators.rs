//! `or` and `and` where-clauses.

use serde_json::json;

use crate::e2e_tests::helpers::{ids, query};
use crate::testing::fixtures::social_store;

#[test]
fn test_or() {
    let store = social_store();

    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "or": [{ "name": "Joe" }, { "name": "Bob" }] } } } }),
    );

    assert_eq!(ids(&result, "users"), vec!["u1", "u3"]);
}

/// Each branch hops through `posts` on its own, so one post need not satisfy
/// both branches.
#[test]
fn test_or_branches_do_not_share_hops() {
    let store = social_store();

    let result = query(
        &store,
        &json!({
            "users": { "$": { "where": { "or": [{ "posts.title": "Hello" }, { "posts.title": "Third" }] } } }
        }),
    );

    assert_eq!(ids(&result, "users"), vec!["u1", "u2"]);
}

#[test]
fn test_and_across_hops() {
    let store = social_store();

    // u1 wrote both posts, through different hops.
    let result = query(
        &store,
        &json!({
            "users": { "$": { "where": { "and": [{ "posts.title": "Hello" }, { "posts.title": "Again" }] } } }
        }),
    );

    assert_eq!(ids(&result, "users"), vec!["u1"]);
}

#[test]
fn test_and_with_nested_or() {
    let store = social_store();

    let result = query(
        &store,
        &json!({
            "users": { "$": { "where": {
                "and": [
                    { "email": { "$isNull": false } },
                    { "or": [{ "name": "Ann" }, { "name": "Bob" }] }
                ]
            } } }
        }),
    );

    assert_eq!(ids(&result, "users"), vec!["u2"]);
}

#[test]
fn test_combinator_alongside_field() {
    let store = social_store();

    let result = query(
        &store,
        &json!({
            "users": { "$": { "where": {
                "name": "Joe",
                "or": [{ "email": "joe@example.com" }, { "email": "nobody@example.com" }]
            } } }
        }),
    );

    assert_eq!(ids(&result, "users"), vec!["u1"]);
}
