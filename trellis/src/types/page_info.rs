//! Pagination state supplied by the pagination coordinator.
//!
//! The coordinator speaks in kebab-case keys (`start-cursor`,
//! `has-next-page?`); results are handed back to callers in camelCase. The
//! query core only reads cursors and never computes them.

use serde::{Deserialize, Serialize};

use crate::types::{AttributeId, EntityId, Time};

/// A position in an ordered result set: the `[e, a, v, t]` of the anchoring
/// triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "(EntityId, AttributeId, serde_json::Value, Time)",
    into = "(EntityId, AttributeId, serde_json::Value, Time)"
)]
#[allow(clippy::disallowed_methods)] // Clone required by serde(into)
pub struct Cursor {
    pub entity: EntityId,
    pub attribute: AttributeId,
    pub value: serde_json::Value,
    pub time: Time,
}

impl From<(EntityId, AttributeId, serde_json::Value, Time)> for Cursor {
    fn from((entity, attribute, value, time): (EntityId, AttributeId, serde_json::Value, Time)) -> Self {
        Self {
            entity,
            attribute,
            value,
            time,
        }
    }
}

impl From<Cursor> for (EntityId, AttributeId, serde_json::Value, Time) {
    fn from(c: Cursor) -> Self {
        (c.entity, c.attribute, c.value, c.time)
    }
}

/// Per-namespace cursor state as delivered by the coordinator.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PageInfo {
    #[serde(default, rename = "start-cursor")]
    pub start_cursor: Option<Cursor>,
    #[serde(default, rename = "end-cursor")]
    pub end_cursor: Option<Cursor>,
    #[serde(default, rename = "has-next-page?")]
    pub has_next_page: bool,
    #[serde(default, rename = "has-previous-page?")]
    pub has_previous_page: bool,
}

/// Page info in the caller-facing shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedPageInfo {
    pub start_cursor: Option<Cursor>,
    pub end_cursor: Option<Cursor>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl From<&PageInfo> for FormattedPageInfo {
    fn from(info: &PageInfo) -> Self {
        Self {
            start_cursor: info.start_cursor.clone(),
            end_cursor: info.end_cursor.clone(),
            has_next_page: info.has_next_page,
            has_previous_page: info.has_previous_page,
        }
    }
}
