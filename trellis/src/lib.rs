// Life of a query:
// 1. JSON comes in
// 2. Parse into a typed query form (namespaces, `$` options, where-clauses)
// 3. For each top-level namespace:
//     - Compile the where-clause into match patterns
//     - Execute the patterns against the store
//     - Materialize entities into objects
//     - Recursively resolve child namespaces through their relationships
// 4. Wrap in the `{data, pageInfo, aggregate}` envelope
//
// System components:
//  - Triple store (catalog, indices, materialization)
//  - Pattern compiler and execution engine
//  - Resolver / extender

pub mod config;
pub mod query;
pub mod service;
pub mod store;
pub mod types;

mod e2e_tests;
#[cfg(test)]
mod testing;
