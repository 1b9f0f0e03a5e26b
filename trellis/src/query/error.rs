//! Errors raised while compiling and resolving queries.

use std::fmt;

use crate::query::engine::EngineError;
use crate::types::AttributeId;

/// Errors that can occur during query resolution.
///
/// Only `AttrNotFound` is recoverable: the resolver turns it into an empty
/// namespace and the extender into an absent relationship. Everything else
/// aborts the query.
#[derive(Debug, PartialEq)]
pub enum QueryError {
    /// A referenced label has no attribute in the catalog.
    AttrNotFound(String),
    /// A path segment used as a relationship hop is a scalar attribute.
    NotARef { attr_id: AttributeId },
    /// The execution engine failed.
    Engine(EngineError),
}

impl QueryError {
    pub(crate) fn attr_not_found(etype: &str, label: &str) -> Self {
        Self::AttrNotFound(format!("no attribute {label} on {etype}"))
    }

    /// Whether this error degrades to an empty result instead of failing.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::AttrNotFound(_))
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttrNotFound(message) => write!(f, "attribute not found: {message}"),
            Self::NotARef { attr_id } => write!(f, "attribute {attr_id} is not a ref"),
            Self::Engine(e) => write!(f, "engine error: {e}"),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Engine(e) => Some(e),
            Self::AttrNotFound(_) | Self::NotARef { .. } => None,
        }
    }
}

impl From<EngineError> for QueryError {
    fn from(e: EngineError) -> Self {
        Self::Engine(e)
    }
}
