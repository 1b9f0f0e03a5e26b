//! Anchoring rows to a pagination start cursor.
//!
//! Rows are ordered by time, then entity id. A page starts at its start
//! cursor: rows that sort strictly before it in the requested direction belong
//! to earlier pages.

use std::cmp::Ordering;

use crate::query::types::Row;
use crate::types::{Cursor, Direction};

/// Whether `row` sorts strictly before `start` in `direction`.
#[must_use]
pub fn is_before(start: &Cursor, direction: Direction, row: &Row) -> bool {
    let ordering = row
        .time
        .cmp(&start.time)
        .then_with(|| row.id.cmp(&start.entity));
    match direction {
        Direction::Asc => ordering == Ordering::Less,
        Direction::Desc => ordering == Ordering::Greater,
    }
}

/// Drop the rows that precede `start`.
pub fn anchor(rows: &mut Vec<Row>, start: &Cursor, direction: Direction) {
    rows.retain(|row| !is_before(start, direction, row));
}
