//! Query forms: the nested, declarative input tree.
//!
//! A query maps namespace names to forms:
//!
//! ```json
//! {
//!   "users": {
//!     "$": { "where": { "name": "Joe" }, "limit": 10 },
//!     "posts": {}
//!   }
//! }
//! ```
//!
//! The `$` key holds the form's options; every other key is a child namespace
//! reached by traversing the relationship with that label. Forms are parsed
//! once from JSON into the typed structures below, so the compiler never
//! inspects raw JSON shapes. Key order is preserved throughout.

use std::fmt;

use crate::types::{Value, ValueError};

/// The options key of a form.
pub const OPTIONS_KEY: &str = "$";

/// Result ordering requested by a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// A leaf condition on a path.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The value at the path equals the literal.
    Literal(Value),
    /// The value at the path differs from the literal, or is missing.
    Not(Value),
    /// The value at the path is (or is not) missing.
    IsNull(bool),
}

/// Boolean combinator keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Or,
    And,
}

impl Combinator {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "or" => Some(Self::Or),
            "and" => Some(Self::And),
            _ => None,
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Or => write!(f, "or"),
            Self::And => write!(f, "and"),
        }
    }
}

/// One entry of a where-clause.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereEntry {
    /// `or`/`and` over nested clauses sharing the namespace's entity.
    Group {
        combinator: Combinator,
        branches: Vec<WhereClause>,
    },
    /// A dotted path (already split) and its condition.
    Path {
        path: Vec<String>,
        condition: Condition,
    },
}

/// An ordered where-clause.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhereClause {
    pub entries: Vec<WhereEntry>,
}

impl WhereClause {
    /// Parse a where-clause object.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, FormError> {
        let object = json
            .as_object()
            .ok_or_else(|| FormError::NotAnObject("where".to_owned()))?;

        let mut entries = Vec::with_capacity(object.len());
        for (key, value) in object {
            if let (Some(combinator), Some(branches)) = (Combinator::from_key(key), value.as_array())
            {
                let branches = branches
                    .iter()
                    .map(Self::from_json)
                    .collect::<Result<Vec<_>, _>>()?;
                entries.push(WhereEntry::Group {
                    combinator,
                    branches,
                });
                continue;
            }

            entries.push(WhereEntry::Path {
                path: key.split('.').map(ToOwned::to_owned).collect(),
                condition: parse_condition(key, value)?,
            });
        }

        Ok(Self { entries })
    }
}

fn parse_condition(key: &str, value: &serde_json::Value) -> Result<Condition, FormError> {
    let Some(object) = value.as_object() else {
        return Value::from_json(value)
            .map(Condition::Literal)
            .map_err(|e| FormError::invalid_condition(key, &e));
    };

    if let Some(negated) = object.get("$not").or_else(|| object.get("not")) {
        return Value::from_json(negated)
            .map(Condition::Not)
            .map_err(|e| FormError::invalid_condition(key, &e));
    }

    if let Some(is_null) = object.get("$isNull").or_else(|| object.get("isNull")) {
        return is_null
            .as_bool()
            .map(Condition::IsNull)
            .ok_or_else(|| FormError::InvalidCondition {
                path: key.to_owned(),
                message: format!("$isNull expects a boolean, got {is_null}"),
            });
    }

    Err(FormError::InvalidCondition {
        path: key.to_owned(),
        message: format!("unsupported condition {value}"),
    })
}

/// Options under a form's `$` key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormConfig {
    pub where_clause: Option<WhereClause>,
    /// `limit`, falling back to `first` then `last`.
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
    pub order: Option<Direction>,
}

impl FormConfig {
    fn from_json(json: &serde_json::Value) -> Result<Self, FormError> {
        let object = json
            .as_object()
            .ok_or_else(|| FormError::NotAnObject(OPTIONS_KEY.to_owned()))?;

        let where_clause = match object.get("where") {
            None | Some(serde_json::Value::Null) => None,
            Some(w) => Some(WhereClause::from_json(w)?),
        };

        // A zero limit means "no limit", as does a missing one.
        let mut limit = None;
        for name in ["limit", "first", "last"] {
            if let Some(n) = parse_count(object, name)?.filter(|n| *n > 0) {
                limit = Some(n);
                break;
            }
        }

        let order = match object.get("order") {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::Object(fields)) => match fields.values().next() {
                None => None,
                Some(direction) => Some(
                    direction
                        .as_str()
                        .and_then(Direction::parse)
                        .ok_or_else(|| FormError::InvalidOption {
                            name: "order".to_owned(),
                            message: format!("expected \"asc\" or \"desc\", got {direction}"),
                        })?,
                ),
            },
            Some(other) => {
                return Err(FormError::InvalidOption {
                    name: "order".to_owned(),
                    message: format!("expected an object, got {other}"),
                });
            }
        };

        Ok(Self {
            where_clause,
            limit,
            offset: parse_count(object, "offset")?,
            before: present(object, "before"),
            after: present(object, "after"),
            order,
        })
    }

    /// Whether rows can only be materialized relative to a start cursor.
    #[must_use]
    pub fn needs_start_cursor(&self) -> bool {
        self.offset.is_some_and(|n| n > 0) || self.before.is_some() || self.after.is_some()
    }

    /// The requested ordering, ascending unless stated.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.order.unwrap_or_default()
    }
}

fn present(
    object: &serde_json::Map<String, serde_json::Value>,
    name: &str,
) -> Option<serde_json::Value> {
    object
        .get(name)
        .filter(|v| !v.is_null() && *v != &serde_json::Value::Bool(false))
        .cloned()
}

fn parse_count(
    object: &serde_json::Map<String, serde_json::Value>,
    name: &str,
) -> Result<Option<usize>, FormError> {
    match object.get(name) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| FormError::InvalidOption {
                name: name.to_owned(),
                message: format!("expected a non-negative integer, got {v}"),
            }),
    }
}

/// One namespace's form: options plus child namespaces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Form {
    pub config: FormConfig,
    pub children: Vec<(String, Self)>,
}

impl Form {
    /// Parse a form object.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, FormError> {
        let object = json
            .as_object()
            .ok_or_else(|| FormError::NotAnObject("form".to_owned()))?;

        let mut config = FormConfig::default();
        let mut children = Vec::new();
        for (key, value) in object {
            if key == OPTIONS_KEY {
                config = FormConfig::from_json(value)?;
            } else {
                children.push((key.as_str().to_owned(), Self::from_json(value)?));
            }
        }

        Ok(Self { config, children })
    }

    /// A form with only a where-clause, handy for building queries in code.
    #[must_use]
    pub fn with_where(where_clause: WhereClause) -> Self {
        Self {
            config: FormConfig {
                where_clause: Some(where_clause),
                ..FormConfig::default()
            },
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A whole query: namespace name to form, in request order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryForm {
    pub namespaces: Vec<(String, Form)>,
}

impl QueryForm {
    /// Parse a query object.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, FormError> {
        let object = json
            .as_object()
            .ok_or_else(|| FormError::NotAnObject("query".to_owned()))?;

        let namespaces = object
            .iter()
            .map(|(k, v)| Ok((k.as_str().to_owned(), Form::from_json(v)?)))
            .collect::<Result<Vec<_>, FormError>>()?;

        Ok(Self { namespaces })
    }
}

/// Errors that can occur parsing a query form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// A part of the query that must be an object was not.
    NotAnObject(String),
    /// A where-clause condition had an unsupported shape.
    InvalidCondition { path: String, message: String },
    /// An option under `$` had an invalid value.
    InvalidOption { name: String, message: String },
}

impl FormError {
    fn invalid_condition(path: &str, e: &ValueError) -> Self {
        Self::InvalidCondition {
            path: path.to_owned(),
            message: e.to_string(),
        }
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject(what) => write!(f, "{what} must be an object"),
            Self::InvalidCondition { path, message } => {
                write!(f, "invalid condition for {path}: {message}")
            }
            Self::InvalidOption { name, message } => {
                write!(f, "invalid value for ${name}: {message}")
            }
        }
    }
}

impl std::error::Error for FormError {}
