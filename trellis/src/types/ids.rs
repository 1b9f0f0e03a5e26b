//! ID types for entities and attributes.
//!
//! This module provides newtype wrappers for entity and attribute IDs,
//! ensuring type safety and providing convenient methods for creation
//! and display. IDs are opaque strings (usually UUIDs) handed out by the
//! store; the query core never interprets them beyond equality and ordering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique identifier for an entity.
///
/// # Invariants
///
/// - The ID is compared byte-wise; two IDs are equal iff their strings are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[allow(clippy::disallowed_methods)] // Clone needed for result maps keyed by id
pub struct EntityId(pub String);

impl EntityId {
    /// Create an entity ID from a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis::types::EntityId;
    /// let id = EntityId::from_string("user1");
    /// assert_eq!(id.as_str(), "user1");
    /// ```
    #[must_use]
    pub fn from_string(s: &str) -> Self {
        Self(s.to_owned())
    }

    /// Get the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A catalog attribute identifier.
///
/// # Invariants
///
/// - Stable for the lifetime of the catalog; labels may be renamed, ids may not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[allow(clippy::disallowed_methods)] // Clone needed for catalog indices
pub struct AttributeId(pub String);

impl AttributeId {
    /// Create an attribute ID from a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis::types::AttributeId;
    /// let id = AttributeId::from_string("users-name");
    /// assert_eq!(id.as_str(), "users-name");
    /// ```
    #[must_use]
    pub fn from_string(s: &str) -> Self {
        Self(s.to_owned())
    }

    /// Get the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AttributeId {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_from_str() {
        let id = EntityId::from_string("u1");
        assert_eq!(id.as_str(), "u1");
        assert_eq!(id, EntityId::from("u1"));
    }

    #[test]
    fn test_entity_id_display() {
        let id = EntityId::from_string("user1");
        assert_eq!(format!("{id}"), "user1");
    }

    #[test]
    fn test_entity_id_ordering_is_lexicographic() {
        let a = EntityId::from_string("a");
        let b = EntityId::from_string("b");
        assert!(a < b);
    }

    #[test]
    fn test_attribute_id_serializes_as_plain_string() {
        let id = AttributeId::from_string("users-name");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"users-name\"");
    }

    #[test]
    fn test_entity_id_equality() {
        let id1 = EntityId::from_string("test");
        let id2 = EntityId::from_string("test");
        let id3 = EntityId::from_string("other");
        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }
}
