//! End-to-end tests at the query level.
//!
//! Each test file covers a specific scenario, running JSON queries against
//! the fixture graph (or a store built in the test) and checking the
//! serialized result envelope.

#![cfg(test)]

mod helpers;

mod test_aggregate;
mod test_combinators;
mod test_determinism;
mod test_end_to_end;
mod test_fast_path;
mod test_is_null;
mod test_limit;
mod test_missing_attribute;
mod test_nested;
mod test_pagination;
mod test_reverse_traversal;
mod test_snapshot_file;
mod test_structural_errors;
mod test_update_overwrites;
mod test_where_not;
