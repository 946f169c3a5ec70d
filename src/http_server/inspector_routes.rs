//! Inspector HTTP Routes
//!
//! Three read-only resources, one per report. Each accepts `GET` and
//! `OPTIONS` only; anything else is `405` with an empty body. Cross-origin
//! headers are attached to every response from these routes, errors
//! included.

use std::sync::Arc;

use axum::{
    extract::State,
    handler::Handler,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::inspector::{Inspector, InspectorError, DEFAULT_LIMIT};

/// `Access-Control-Allow-Origin`
pub const ALLOW_ORIGIN: &str = "*";
/// `Access-Control-Allow-Methods`
pub const ALLOW_METHODS: &str = "GET, OPTIONS";
/// `Access-Control-Allow-Headers`
pub const ALLOW_HEADERS: &str = "Content-Type";

// ==================
// Shared State
// ==================

/// Handler state: the inspector and nothing else
pub struct InspectorState {
    pub inspector: Inspector,
}

impl InspectorState {
    pub fn new(inspector: Inspector) -> Self {
        Self { inspector }
    }
}

// ==================
// Inspector Routes
// ==================

/// Create inspector routes (mounted under `/api`)
pub fn inspector_routes(state: Arc<InspectorState>) -> Router {
    Router::new()
        .route("/tables/top", resource(top_tables_handler))
        .route("/tables/non-innodb", resource(engines_handler))
        .route("/tables/fragmentation", resource(fragmentation_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static(ALLOW_ORIGIN),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static(ALLOW_METHODS),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static(ALLOW_HEADERS),
                )),
        )
        .with_state(state)
}

/// Method policy shared by every resource. HEAD is listed explicitly so it
/// does not fall through to the GET handler.
fn resource<H, T>(handler: H) -> MethodRouter<Arc<InspectorState>>
where
    H: Handler<T, Arc<InspectorState>>,
    T: 'static,
{
    get(handler)
        .head(method_not_allowed_handler)
        .options(preflight_handler)
        .fallback(method_not_allowed_handler)
}

// ==================
// Handlers
// ==================

async fn top_tables_handler(
    State(state): State<Arc<InspectorState>>,
) -> Result<Response, InspectorError> {
    let tables = state.inspector.top_tables_by_row_count(DEFAULT_LIMIT).await?;
    json_array(&tables)
}

async fn engines_handler(
    State(state): State<Arc<InspectorState>>,
) -> Result<Response, InspectorError> {
    let tables = state.inspector.list_tables_by_engine().await?;
    json_array(&tables)
}

async fn fragmentation_handler(
    State(state): State<Arc<InspectorState>>,
) -> Result<Response, InspectorError> {
    let tables = state.inspector.top_fragmented_tables(DEFAULT_LIMIT).await?;
    json_array(&tables)
}

/// Browser preflight: headers only, never touches the catalog
async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed_handler() -> StatusCode {
    StatusCode::METHOD_NOT_ALLOWED
}

// ==================
// Helper Functions
// ==================

/// Encode records as a JSON array in the order given.
///
/// Encoding happens before any byte is written, so a failure yields the
/// error envelope rather than a truncated array.
fn json_array<T: Serialize>(records: &[T]) -> Result<Response, InspectorError> {
    let body = serde_json::to_vec(records)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response())
}
