//! Errors that abort the whole query.

use serde_json::json;

use crate::query::QueryError;
use crate::testing::{fixtures::social_store, run_json};
use crate::types::{AttributeId, QueryForm};

#[test]
fn test_hop_through_scalar_aborts() {
    let store = social_store();

    let err = run_json(&store, &json!({ "users": { "$": { "where": { "name.first": "Joe" } } } }))
        .unwrap_err();

    assert_eq!(
        err,
        QueryError::NotARef {
            attr_id: AttributeId::from("users-name")
        }
    );
}

#[test]
fn test_scalar_hop_in_child_namespace_aborts() {
    let store = social_store();

    let err = run_json(
        &store,
        &json!({ "users": { "posts": { "$": { "where": { "title.text": "x" } } } } }),
    )
    .unwrap_err();

    assert!(matches!(err, QueryError::NotARef { .. }));
}

#[test]
fn test_scalar_as_child_namespace_aborts() {
    let store = social_store();

    let err = run_json(&store, &json!({ "users": { "name": {} } })).unwrap_err();

    assert!(matches!(err, QueryError::NotARef { .. }));
}

#[test]
fn test_malformed_forms_are_rejected_before_evaluation() {
    assert!(QueryForm::from_json(&json!({ "users": [] })).is_err());
    assert!(QueryForm::from_json(&json!({ "users": { "$": { "where": { "or": {} } } } })).is_err());
    assert!(QueryForm::from_json(&json!({ "users": { "$": { "where": { "name": { "$isNull": "yes" } } } } })).is_err());
    assert!(QueryForm::from_json(&json!({ "users": { "$": { "limit": -1 } } })).is_err());
}
