//! HTTP API Tests
//!
//! Drives the full router in-process against in-memory catalogs:
//! - GET returns ranked JSON arrays with CORS headers
//! - OPTIONS short-circuits without touching the catalog
//! - Other methods are 405 with an empty body
//! - Catalog failures become a 500 error envelope

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use mysql_inspector::http_server::{
    ErrorEnvelope, HttpServer, HttpServerConfig, ALLOW_HEADERS, ALLOW_METHODS, ALLOW_ORIGIN,
};
use mysql_inspector::inspector::{
    CatalogFuture, CatalogSource, CatalogTable, EngineRecord, EnginePolicy, FragmentationRecord,
    Inspector, InspectorError, MemoryCatalog, TableRowRecord,
};

const ENDPOINTS: [&str; 3] = [
    "/api/tables/top",
    "/api/tables/non-innodb",
    "/api/tables/fragmentation",
];

// =============================================================================
// Test Catalogs
// =============================================================================

/// Wraps a memory catalog and counts every query issued.
struct CountingCatalog {
    inner: MemoryCatalog,
    calls: AtomicUsize,
}

impl CountingCatalog {
    fn new(inner: MemoryCatalog) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CatalogSource for CountingCatalog {
    fn top_tables_by_row_count(&self, limit: NonZeroUsize) -> CatalogFuture<'_, Vec<TableRowRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.top_tables_by_row_count(limit)
    }

    fn tables_by_engine(&self, policy: EnginePolicy) -> CatalogFuture<'_, Vec<EngineRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.tables_by_engine(policy)
    }

    fn top_fragmented_tables(
        &self,
        limit: NonZeroUsize,
    ) -> CatalogFuture<'_, Vec<FragmentationRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.top_fragmented_tables(limit)
    }

    fn ping(&self) -> CatalogFuture<'_, ()> {
        self.inner.ping()
    }
}

/// Every call fails as if the server had gone away.
struct UnreachableCatalog;

impl CatalogSource for UnreachableCatalog {
    fn top_tables_by_row_count(&self, _limit: NonZeroUsize) -> CatalogFuture<'_, Vec<TableRowRecord>> {
        Box::pin(async { Err(unreachable_error()) })
    }

    fn tables_by_engine(&self, _policy: EnginePolicy) -> CatalogFuture<'_, Vec<EngineRecord>> {
        Box::pin(async { Err(unreachable_error()) })
    }

    fn top_fragmented_tables(
        &self,
        _limit: NonZeroUsize,
    ) -> CatalogFuture<'_, Vec<FragmentationRecord>> {
        Box::pin(async { Err(unreachable_error()) })
    }

    fn ping(&self) -> CatalogFuture<'_, ()> {
        Box::pin(async { Err(unreachable_error()) })
    }
}

fn unreachable_error() -> InspectorError {
    InspectorError::Query("Can't connect to MySQL server on 'db:3306'".to_string())
}

/// Never answers.
struct HangingCatalog;

impl CatalogSource for HangingCatalog {
    fn top_tables_by_row_count(&self, _limit: NonZeroUsize) -> CatalogFuture<'_, Vec<TableRowRecord>> {
        Box::pin(std::future::pending())
    }

    fn tables_by_engine(&self, _policy: EnginePolicy) -> CatalogFuture<'_, Vec<EngineRecord>> {
        Box::pin(std::future::pending())
    }

    fn top_fragmented_tables(
        &self,
        _limit: NonZeroUsize,
    ) -> CatalogFuture<'_, Vec<FragmentationRecord>> {
        Box::pin(std::future::pending())
    }

    fn ping(&self) -> CatalogFuture<'_, ()> {
        Box::pin(std::future::pending())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn router_with(catalog: Arc<dyn CatalogSource>) -> Router {
    router_with_config(catalog, HttpServerConfig::default())
}

fn router_with_config(catalog: Arc<dyn CatalogSource>, config: HttpServerConfig) -> Router {
    let inspector = Inspector::new(catalog).with_query_timeout(Duration::from_millis(50));
    HttpServer::with_config(config, inspector).router()
}

fn sample_schema() -> MemoryCatalog {
    MemoryCatalog::new("app").with_tables([
        CatalogTable::new("app", "A", "InnoDB")
            .with_rows(100)
            .with_storage(1000, 200, 250),
        CatalogTable::new("app", "B", "MyISAM")
            .with_rows(50)
            .with_storage(0, 0, 500),
        CatalogTable::new("app", "C", "InnoDB").with_rows(0),
        CatalogTable::new("other", "D", "MEMORY").with_rows(999_999),
    ])
}

async fn send(router: Router, method: Method, uri: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    router.oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn assert_cors_headers(response: &Response) {
    let headers = response.headers();
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), ALLOW_ORIGIN);
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(), ALLOW_METHODS);
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(), ALLOW_HEADERS);
}

// =============================================================================
// GET Tests
// =============================================================================

/// Top tables come back ranked, scoped to the bound schema, with CORS headers.
#[tokio::test]
async fn test_get_top_tables() {
    let response = send(router_with(Arc::new(sample_schema())), Method::GET, "/api/tables/top").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_cors_headers(&response);

    let body = body_json(response).await;
    assert_eq!(
        body,
        serde_json::json!([
            {"table_name": "A", "row_count": 100},
            {"table_name": "B", "row_count": 50},
            {"table_name": "C", "row_count": 0},
        ])
    );
}

/// Non-InnoDB tables are listed before InnoDB ones.
#[tokio::test]
async fn test_get_non_innodb_tables() {
    let response = send(
        router_with(Arc::new(sample_schema())),
        Method::GET,
        "/api/tables/non-innodb",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors_headers(&response);

    let body = body_json(response).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["table_name"], "B");
    assert_eq!(rows[0]["engine"], "MyISAM");
    assert_eq!(rows[0]["table_schema"], "app");
    assert_eq!(rows[1]["table_name"], "A");
    assert_eq!(rows[1]["data_length"], 1000);
    assert_eq!(rows[1]["index_length"], 200);
    assert_eq!(rows[2]["table_name"], "C");
}

/// The engine listing stays capped at ten even when every table is InnoDB.
#[tokio::test]
async fn test_get_non_innodb_cap_with_all_innodb() {
    let catalog = MemoryCatalog::new("app")
        .with_tables((0..14).map(|i| CatalogTable::new("app", format!("t{:02}", i), "InnoDB")));
    let response = send(router_with(Arc::new(catalog)), Method::GET, "/api/tables/non-innodb").await;

    let body = body_json(response).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 10);
    assert!(rows.iter().all(|r| r["engine"] == "InnoDB"));
}

/// Zero-length tables are omitted; the ratio is rounded to two decimals.
#[tokio::test]
async fn test_get_fragmentation() {
    let response = send(
        router_with(Arc::new(sample_schema())),
        Method::GET,
        "/api/tables/fragmentation",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors_headers(&response);

    let body = body_json(response).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["table_name"], "A");
    assert_eq!(rows[0]["data_free"], 250);
    assert_eq!(rows[0]["data_length"], 1000);
    assert_eq!(rows[0]["fragment_ratio"], 25.0);
    assert_eq!(rows[0]["fragment_size"], 250);
}

/// Empty schema yields an empty array, not an error.
#[tokio::test]
async fn test_get_empty_schema() {
    for uri in ENDPOINTS {
        let response = send(router_with(Arc::new(MemoryCatalog::new("empty"))), Method::GET, uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"[]");
    }
}

/// Concurrent requests each get a complete, identical answer.
#[tokio::test]
async fn test_concurrent_gets_are_independent() {
    let router = router_with(Arc::new(MemoryCatalog::demo()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let router = router.clone();
            tokio::spawn(async move { body_json(send(router, Method::GET, "/api/tables/top").await).await })
        })
        .collect();

    let mut bodies = Vec::new();
    for handle in handles {
        bodies.push(handle.await.unwrap());
    }
    assert!(bodies.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(bodies[0].as_array().unwrap().len(), 7);
}

// =============================================================================
// Method Policy Tests
// =============================================================================

/// OPTIONS succeeds with headers only, even with the database unreachable.
#[tokio::test]
async fn test_options_short_circuits() {
    for uri in ENDPOINTS {
        let response = send(router_with(Arc::new(UnreachableCatalog)), Method::OPTIONS, uri).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors_headers(&response);
        assert!(body_bytes(response).await.is_empty());
    }
}

/// OPTIONS never reaches the catalog.
#[tokio::test]
async fn test_options_does_not_query() {
    let catalog = CountingCatalog::new(sample_schema());
    for uri in ENDPOINTS {
        send(router_with(catalog.clone()), Method::OPTIONS, uri).await;
    }
    assert_eq!(catalog.calls(), 0);
}

/// POST is rejected before any query runs.
#[tokio::test]
async fn test_post_is_method_not_allowed() {
    let catalog = CountingCatalog::new(sample_schema());
    let response = send(router_with(catalog.clone()), Method::POST, "/api/tables/top").await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_cors_headers(&response);
    assert!(body_bytes(response).await.is_empty());
    assert_eq!(catalog.calls(), 0);
}

/// Every other method is 405 on every resource.
#[tokio::test]
async fn test_other_methods_rejected() {
    let catalog = CountingCatalog::new(sample_schema());
    for uri in ENDPOINTS {
        for method in [Method::PUT, Method::DELETE, Method::PATCH, Method::HEAD] {
            let response = send(router_with(catalog.clone()), method.clone(), uri).await;
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, uri);
        }
    }
    assert_eq!(catalog.calls(), 0);
}

/// GET issues exactly one catalog query.
#[tokio::test]
async fn test_get_queries_once() {
    let catalog = CountingCatalog::new(sample_schema());
    for uri in ENDPOINTS {
        send(router_with(catalog.clone()), Method::GET, uri).await;
    }
    assert_eq!(catalog.calls(), 3);
}

// =============================================================================
// Failure Tests
// =============================================================================

/// Query failures become a 500 envelope carrying the cause.
#[tokio::test]
async fn test_query_failure_envelope() {
    for uri in ENDPOINTS {
        let response = send(router_with(Arc::new(UnreachableCatalog)), Method::GET, uri).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors_headers(&response);

        let envelope: ErrorEnvelope = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(envelope.kind, "query_failed");
        assert!(envelope.message.contains("Can't connect to MySQL server"));
    }
}

/// A query that outlives the deadline is a 500 with kind `query_timeout`.
#[tokio::test]
async fn test_query_timeout_envelope() {
    let response = send(router_with(Arc::new(HangingCatalog)), Method::GET, "/api/tables/top").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let envelope: ErrorEnvelope = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(envelope.kind, "query_timeout");
}

/// A failed request does not poison the next one.
#[tokio::test]
async fn test_server_keeps_serving_after_failure() {
    let failing = router_with(Arc::new(UnreachableCatalog));
    let response = send(failing.clone(), Method::GET, "/api/tables/top").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = send(failing, Method::OPTIONS, "/api/tables/top").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Static Page & Health Tests
// =============================================================================

/// `/` serves the configured dashboard page.
#[tokio::test]
async fn test_index_served() {
    let tmp = TempDir::new().unwrap();
    let index = tmp.path().join("index.html");
    std::fs::write(&index, "<html><body>inspector</body></html>").unwrap();

    let config = HttpServerConfig {
        index_path: index.display().to_string(),
        ..Default::default()
    };
    let response = send(router_with_config(Arc::new(sample_schema()), config), Method::GET, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(String::from_utf8(body_bytes(response).await).unwrap().contains("inspector"));
}

/// Missing dashboard page is 404.
#[tokio::test]
async fn test_index_missing() {
    let tmp = TempDir::new().unwrap();
    let config = HttpServerConfig {
        index_path: tmp.path().join("nope.html").display().to_string(),
        ..Default::default()
    };
    let response = send(router_with_config(Arc::new(sample_schema()), config), Method::GET, "/").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Unknown paths are 404.
#[tokio::test]
async fn test_unknown_path() {
    let response = send(router_with(Arc::new(sample_schema())), Method::GET, "/api/tables/unknown").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Health reflects catalog reachability.
#[tokio::test]
async fn test_health() {
    let response = send(router_with(Arc::new(sample_schema())), Method::GET, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    let response = send(router_with(Arc::new(UnreachableCatalog)), Method::GET, "/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["database"], "unreachable");
}
