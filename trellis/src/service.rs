//! HTTP query service.
//!
//! `POST /query` with a body of
//!
//! ```json
//! { "query": { "users": {} }, "pageInfo": { ... }, "aggregate": { ... } }
//! ```
//!
//! answers with the result envelope. Malformed query forms are rejected with
//! `400`; queries that fail structurally with `422`. Both carry
//! `{"error": message}`.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Deserialize;

use crate::query::{FastPathTable, MatchEngine, QueryContext, QueryError, run_query};
use crate::store::MemoryStore;
use crate::types::{FormError, PageInfo, QueryForm};

/// Shared, read-only service state.
#[derive(Clone)]
#[allow(clippy::disallowed_methods)] // Arc::clone is expected for shared state
pub struct AppState {
    store: Arc<MemoryStore>,
    fast_paths: Arc<FastPathTable>,
}

impl AppState {
    #[must_use]
    pub fn new(store: MemoryStore, fast_paths: FastPathTable) -> Self {
        Self {
            store: Arc::new(store),
            fast_paths: Arc::new(fast_paths),
        }
    }
}

/// Body of a query request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub query: serde_json::Value,
    #[serde(default)]
    pub page_info: Option<BTreeMap<String, PageInfo>>,
    #[serde(default)]
    pub aggregate: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Errors surfaced to HTTP clients.
#[derive(Debug)]
pub enum ServiceError {
    /// The query form could not be parsed.
    BadRequest(FormError),
    /// Evaluation failed.
    Query(QueryError),
    /// The evaluation task or result encoding failed.
    Internal(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(e) => write!(f, "{e}"),
            Self::Query(e) => write!(f, "{e}"),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ServiceError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Query(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

/// The service's routes over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/query", post(query_handler))
        .with_state(state)
}

#[allow(clippy::disallowed_methods)] // Arc::clone to move state onto the blocking pool
async fn query_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let form = QueryForm::from_json(&request.query).map_err(|e| {
        tracing::debug!("Rejecting query: {e}");
        ServiceError::BadRequest(e)
    })?;

    let store = Arc::clone(&state.store);
    let fast_paths = Arc::clone(&state.fast_paths);
    let result = tokio::task::spawn_blocking(move || {
        evaluate(
            &store,
            &fast_paths,
            &form,
            request.page_info.as_ref(),
            request.aggregate.as_ref(),
        )
    })
    .await
    .map_err(|e| ServiceError::Internal(e.to_string()))??;

    Ok(Json(result))
}

/// Run one query against `store` and encode the envelope.
///
/// # Errors
///
/// Returns `Query` for non-recoverable evaluation errors.
pub fn evaluate(
    store: &MemoryStore,
    fast_paths: &FastPathTable,
    form: &QueryForm,
    page_info: Option<&BTreeMap<String, PageInfo>>,
    aggregate: Option<&serde_json::Map<String, serde_json::Value>>,
) -> Result<serde_json::Value, ServiceError> {
    let engine = MatchEngine::new(store);
    let mut ctx = QueryContext::new(store, &engine).with_fast_paths(fast_paths);
    if let Some(page_info) = page_info {
        ctx = ctx.with_page_info(page_info);
    }
    if let Some(aggregate) = aggregate {
        ctx = ctx.with_aggregate(aggregate);
    }

    let result = run_query(&ctx, form).map_err(|e| {
        tracing::warn!("Query failed: {e}");
        ServiceError::Query(e)
    })?;
    serde_json::to_value(&result).map_err(|e| ServiceError::Internal(e.to_string()))
}
