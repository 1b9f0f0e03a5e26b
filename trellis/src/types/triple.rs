//! Stored facts.

use crate::types::{AttributeId, EntityId, Value};

/// A logical timestamp, in milliseconds, recorded when a triple was written.
pub type Time = u64;

/// A complete fact: (entity, attribute, value) plus the time it was written.
///
/// INVARIANT: a ref-kind attribute's value is always `Value::Ref`.
#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    pub entity: EntityId,
    pub attribute: AttributeId,
    pub value: Value,
    pub time: Time,
}

impl Triple {
    /// Create a new triple.
    #[must_use]
    pub const fn new(entity: EntityId, attribute: AttributeId, value: Value, time: Time) -> Self {
        Self {
            entity,
            attribute,
            value,
            time,
        }
    }
}
