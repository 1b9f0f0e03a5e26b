//! Loading a store from a JSON snapshot file.
//!
//! # Format
//!
//! ```json
//! {
//!   "cardinality-inference": true,
//!   "attrs": [
//!     { "id": "users-id", "value-type": "blob", "forward-identity": ["f1", "users", "id"] },
//!     { "id": "users-posts", "value-type": "ref",
//!       "forward-identity": ["f2", "users", "posts"],
//!       "reverse-identity": ["r2", "posts", "author"], "unique?": true }
//!   ],
//!   "triples": [["u1", "users-id", "u1", 1], ["u1", "users-posts", "p1", 2]]
//! }
//! ```

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::store::MemoryStore;
use crate::types::{AttributeDefinition, AttributeId, EntityId, Time, Triple, Value, ValueError};

/// The on-disk representation of a store.
#[derive(Debug, Deserialize)]
pub struct Snapshot {
    #[serde(default, rename = "cardinality-inference")]
    pub cardinality_inference: bool,
    pub attrs: Vec<AttributeDefinition>,
    #[serde(default)]
    pub triples: Vec<(EntityId, AttributeId, serde_json::Value, Time)>,
}

impl Snapshot {
    /// Read a snapshot file.
    pub fn read(path: &Path) -> Result<Self, SnapshotError> {
        let file = File::open(path).map_err(SnapshotError::Io)?;
        serde_json::from_reader(BufReader::new(file)).map_err(SnapshotError::Decode)
    }

    /// Build a store from this snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if a triple names an attribute missing from the
    /// catalog or carries a non-scalar value.
    pub fn into_store(self) -> Result<MemoryStore, SnapshotError> {
        let mut store = MemoryStore::new(self.attrs)
            .with_cardinality_inference(self.cardinality_inference);

        for (entity, attribute, value, time) in self.triples {
            if store.attr(&attribute).is_none() {
                return Err(SnapshotError::UnknownAttribute(attribute));
            }
            let value = Value::from_json(&value).map_err(|e| SnapshotError::InvalidValue {
                entity: entity.clone(),
                source: e,
            })?;
            store.insert(Triple::new(entity, attribute, value, time));
        }

        Ok(store)
    }
}

impl MemoryStore {
    /// Load a store from a snapshot file.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let store = Snapshot::read(path)?.into_store()?;
        tracing::info!(
            "Loaded snapshot {}: {} triples",
            path.display(),
            store.len()
        );
        Ok(store)
    }
}

/// Errors that can occur loading a snapshot.
#[derive(Debug)]
pub enum SnapshotError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file is not a valid snapshot document.
    Decode(serde_json::Error),
    /// A triple refers to an attribute the catalog does not define.
    UnknownAttribute(AttributeId),
    /// A triple carries a value that cannot be stored.
    InvalidValue { entity: EntityId, source: ValueError },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "snapshot I/O error: {e}"),
            Self::Decode(e) => write!(f, "invalid snapshot: {e}"),
            Self::UnknownAttribute(id) => write!(f, "triple refers to unknown attribute {id}"),
            Self::InvalidValue { entity, source } => {
                write!(f, "invalid value on entity {entity}: {source}")
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::UnknownAttribute(_) => None,
            Self::InvalidValue { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::store::{TripleIndex, TripleStore};
    use tempfile::NamedTempFile;

    const SNAPSHOT: &str = r#"{
        "cardinality-inference": true,
        "attrs": [
            { "id": "users-id", "value-type": "blob", "forward-identity": ["f1", "users", "id"] },
            { "id": "users-name", "value-type": "blob", "forward-identity": ["f2", "users", "name"] },
            { "id": "posts-id", "value-type": "blob", "forward-identity": ["f3", "posts", "id"] },
            { "id": "users-posts", "value-type": "ref",
              "forward-identity": ["f4", "users", "posts"],
              "reverse-identity": ["r4", "posts", "author"], "unique?": true }
        ],
        "triples": [
            ["u1", "users-id", "u1", 1],
            ["u1", "users-name", "Joe", 2],
            ["p1", "posts-id", "p1", 3],
            ["u1", "users-posts", "p1", 4]
        ]
    }"#;

    fn write_snapshot(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write snapshot");
        file
    }

    #[test]
    fn test_load_snapshot_file() {
        let file = write_snapshot(SNAPSHOT);
        let store = MemoryStore::load(file.path()).expect("load");

        assert_eq!(store.len(), 4);
        assert!(store.cardinality_inference());
        assert!(store.link("posts", "author").unwrap().is_singular);
        let refs =
            store.triples_referencing(&EntityId::from("p1"), &AttributeId::from("users-posts"));
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn test_unknown_attribute_is_rejected() {
        let file = write_snapshot(
            r#"{ "attrs": [], "triples": [["u1", "users-name", "Joe", 1]] }"#,
        );
        let err = MemoryStore::load(file.path()).unwrap_err();
        assert!(matches!(err, SnapshotError::UnknownAttribute(id) if id.as_str() == "users-name"));
    }

    #[test]
    fn test_compound_value_is_rejected() {
        let file = write_snapshot(
            r#"{
                "attrs": [{ "id": "a", "value-type": "blob", "forward-identity": ["f", "users", "tags"] }],
                "triples": [["u1", "a", ["x"], 1]]
            }"#,
        );
        assert!(matches!(
            MemoryStore::load(file.path()),
            Err(SnapshotError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = MemoryStore::load(Path::new("/nonexistent/snapshot.json")).unwrap_err();
        assert!(matches!(err, SnapshotError::Io(_)));
    }
}
