//! Triple value types and JSON conversion.
//!
//! Provides the `Value` enum stored in the object position of a triple and
//! used as literal conditions in where-clauses, along with conversions to and
//! from `serde_json::Value`.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::types::EntityId;

/// A triple value.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::disallowed_methods)] // Clone needed for literal conditions copied into patterns
pub enum Value {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    /// A reference to another entity. Only appears in `ref`-kind attributes
    /// and in the primary-key attribute, whose value is the entity itself.
    Ref(EntityId),
}

/// Errors that can occur converting JSON into a value.
#[derive(Debug, PartialEq, Eq)]
pub enum ValueError {
    /// Arrays and objects cannot be stored as a single triple value.
    Unsupported(String),
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(json) => write!(f, "unsupported value: {json}"),
        }
    }
}

impl std::error::Error for ValueError {}

impl Value {
    /// Create a string value.
    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Create a number value.
    #[must_use]
    pub fn number(n: impl Into<f64>) -> Self {
        Self::Number(n.into())
    }

    /// Create a reference value.
    #[must_use]
    pub fn reference(id: &str) -> Self {
        Self::Ref(EntityId::from_string(id))
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The entity id this value points at, if it can name one.
    ///
    /// Strings qualify because ids travel as plain strings in query literals.
    #[must_use]
    pub fn as_entity_id(&self) -> Option<&str> {
        match self {
            Self::Ref(id) => Some(id.as_str()),
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a scalar JSON value.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, ValueError> {
        match json {
            serde_json::Value::Null => Ok(Self::Null),
            serde_json::Value::Bool(b) => Ok(Self::Boolean(*b)),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Self::Number)
                .ok_or_else(|| ValueError::Unsupported(n.to_string())),
            serde_json::Value::String(s) => Ok(Self::String(s.as_str().to_owned())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                Err(ValueError::Unsupported(json.to_string()))
            }
        }
    }

    /// Convert to JSON for result objects. References become their id string.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::String(s) => serde_json::Value::String(s.as_str().to_owned()),
            Self::Ref(id) => serde_json::Value::String(id.as_str().to_owned()),
        }
    }

    /// Equality used when matching a literal against a stored value.
    ///
    /// Strings and references compare by id so that `{"owner": "u1"}` matches
    /// a stored reference to `u1`.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Boolean(x), Self::Boolean(y)) => x == y,
            (Self::Number(x), Self::Number(y)) => (x - y).abs() < f64::EPSILON,
            (Self::String(_) | Self::Ref(_), Self::String(_) | Self::Ref(_)) => {
                self.as_entity_id() == other.as_entity_id()
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Ref(id) => write!(f, "#{id}"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(Value::from_json(&json!(null)).unwrap(), Value::Null);
        assert_eq!(Value::from_json(&json!(true)).unwrap(), Value::Boolean(true));
        assert_eq!(Value::from_json(&json!(42)).unwrap(), Value::Number(42.0));
        assert_eq!(
            Value::from_json(&json!("Joe")).unwrap(),
            Value::string("Joe")
        );
    }

    #[test]
    fn test_from_json_rejects_compound_values() {
        assert!(matches!(
            Value::from_json(&json!([1, 2])),
            Err(ValueError::Unsupported(_))
        ));
        assert!(Value::from_json(&json!({"a": 1})).is_err());
    }

    #[test]
    fn test_ref_serializes_as_id() {
        let json = serde_json::to_value(Value::reference("p1")).unwrap();
        assert_eq!(json, json!("p1"));
    }

    #[test]
    fn test_string_matches_ref_with_same_id() {
        assert!(Value::string("u1").matches(&Value::reference("u1")));
        assert!(!Value::string("u1").matches(&Value::reference("u2")));
    }

    #[test]
    fn test_number_does_not_match_string() {
        assert!(!Value::number(1.0).matches(&Value::string("1")));
        assert!(Value::number(1.0).matches(&Value::number(1.0)));
    }
}
