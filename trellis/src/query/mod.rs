//! Query resolution.
//!
//! Turns a nested query form into nested result objects:
//!
//! - [`path`] and [`where_clause`] compile a namespace's where-clause into
//!   match patterns over `(entity, attribute, value, time)` facts
//! - [`engine`] executes a pattern set and returns ordered `(id, time)` rows
//! - [`resolver`] gates pagination, executes, anchors to the start cursor,
//!   materializes objects and applies the limit
//! - [`extend`] recursively attaches related entities for child namespaces
//! - [`orchestrator`] runs every top-level namespace and builds the envelope
//!
//! # Example
//!
//! ```ignore
//! use trellis::query::{MatchEngine, QueryContext, run_query};
//! use trellis::types::QueryForm;
//!
//! let store = MemoryStore::load(path)?;
//! let engine = MatchEngine::new(&store);
//! let query = QueryForm::from_json(&json!({
//!     "users": { "$": { "where": { "name": "Joe" } }, "posts": {} }
//! }))?;
//!
//! let result = run_query(&QueryContext::new(&store, &engine), &query)?;
//! println!("{}", serde_json::to_string(&result)?);
//! ```

pub mod bindings;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod extend;
pub mod fast_path;
pub mod orchestrator;
pub mod path;
pub mod resolver;
pub mod types;
pub mod vars;
pub mod where_clause;

pub use engine::{EngineError, ExecutionEngine, MatchEngine};
pub use error::QueryError;
pub use fast_path::{FastPath, FastPathTable};
pub use orchestrator::{QueryContext, QueryResult, run_query};
pub use path::{Hop, HopDirection, PatternCompiler};
pub use resolver::Resolver;
pub use types::{Clause, Datom, Find, Pattern, PatternElement, PatternGroup, Row, Variable};
pub use vars::{Namer, VarAllocator};
