//! Paths that follow relationships backwards.

use serde_json::json;

use crate::e2e_tests::helpers::{empty, ids, query};
use crate::testing::fixtures::social_store;

#[test]
fn test_filter_through_reverse_label() {
    let store = social_store();

    let result = query(&store, &json!({ "posts": { "$": { "where": { "author.name": "Ann" } } } }));

    assert_eq!(ids(&result, "posts"), vec!["p3"]);
}

#[test]
fn test_filter_through_forward_label() {
    let store = social_store();

    let result = query(&store, &json!({ "users": { "$": { "where": { "posts.title": "Again" } } } }));

    assert_eq!(ids(&result, "users"), vec!["u1"]);
}

#[test]
fn test_round_trip_through_both_directions() {
    let store = social_store();

    let result = query(
        &store,
        &json!({ "comments": { "$": { "where": { "post.author.email": "ann@example.com" } } } }),
    );

    assert_eq!(ids(&result, "comments"), vec!["c1"]);
}

#[test]
fn test_filter_by_related_id() {
    let store = social_store();

    let result = query(&store, &json!({ "users": { "$": { "where": { "posts.id": "p2" } } } }));

    assert_eq!(ids(&result, "users"), vec!["u1"]);
}

/// Null prefixes end on a forward leaf, so a negated condition behind a
/// reverse hop cannot be compiled and the namespace resolves empty.
#[test]
fn test_not_through_reverse_label_is_empty() {
    let store = social_store();

    let result = query(
        &store,
        &json!({ "posts": { "$": { "where": { "author.name": { "$not": "Joe" } } } } }),
    );
    assert_eq!(result, empty("posts"));

    let result = query(
        &store,
        &json!({ "posts": { "$": { "where": { "author.name": { "$isNull": true } } } } }),
    );
    assert_eq!(result, empty("posts"));
}
