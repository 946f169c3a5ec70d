//! Metadata query engine
//!
//! Produces ranked, bounded sequences of table metadata from the schema
//! catalog the connection is bound to. Three reports are available:
//!
//! | Report | Order | Bound |
//! |--------|-------|-------|
//! | [`Inspector::top_tables_by_row_count`] | row estimate desc, name asc | `limit` |
//! | [`Inspector::list_tables_by_engine`] | non-InnoDB first, name asc | [`EnginePolicy::max_results`] |
//! | [`Inspector::top_fragmented_tables`] | ratio desc, data length desc, name asc | `limit` |
//!
//! Every catalog call runs under the inspector's query deadline. Dropping
//! the returned future (e.g. when an HTTP client disconnects) drops the
//! in-flight query with it.

pub mod catalog;
pub mod errors;
pub mod mysql;
pub mod policy;
pub mod records;

use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

pub use catalog::{CatalogFuture, CatalogSource, MemoryCatalog};
pub use errors::{InspectorError, InspectorResult};
pub use mysql::{MySqlCatalog, MysqlConfig};
pub use policy::{EnginePolicy, EngineSortKey, DEFAULT_LIMIT};
pub use records::{CatalogTable, EngineRecord, FragmentationRecord, TableRowRecord};

use crate::observability::{Event, Logger, Timer};

/// Default per-query deadline
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Report names used in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    TopTables,
    Engines,
    Fragmentation,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopTables => "top_tables",
            Self::Engines => "engines",
            Self::Fragmentation => "fragmentation",
        }
    }
}

/// All three reports from one pass, as printed by `report`.
#[derive(Debug, Clone, Serialize)]
pub struct InspectionReport {
    /// RFC 3339 time the first query was issued
    pub generated_at: String,
    pub top_tables: Vec<TableRowRecord>,
    pub engines: Vec<EngineRecord>,
    pub fragmentation: Vec<FragmentationRecord>,
}

/// Query engine over a shared catalog handle.
///
/// Cloning is cheap; clones share the same catalog.
#[derive(Clone)]
pub struct Inspector {
    catalog: Arc<dyn CatalogSource>,
    query_timeout: Duration,
    engine_policy: EnginePolicy,
}

impl Inspector {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self {
            catalog,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            engine_policy: EnginePolicy::default(),
        }
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    pub fn engine_policy(&self) -> EnginePolicy {
        self.engine_policy
    }

    /// Largest tables by row-count estimate.
    pub async fn top_tables_by_row_count(
        &self,
        limit: NonZeroUsize,
    ) -> InspectorResult<Vec<TableRowRecord>> {
        self.run(ReportKind::TopTables, self.catalog.top_tables_by_row_count(limit))
            .await
    }

    /// Tables in the schema, non-InnoDB first, capped by the engine policy.
    pub async fn list_tables_by_engine(&self) -> InspectorResult<Vec<EngineRecord>> {
        self.run(ReportKind::Engines, self.catalog.tables_by_engine(self.engine_policy))
            .await
    }

    /// Most fragmented tables with non-zero data length.
    pub async fn top_fragmented_tables(
        &self,
        limit: NonZeroUsize,
    ) -> InspectorResult<Vec<FragmentationRecord>> {
        self.run(ReportKind::Fragmentation, self.catalog.top_fragmented_tables(limit))
            .await
    }

    /// Run all three reports in sequence. The first failure aborts.
    pub async fn full_report(&self, limit: NonZeroUsize) -> InspectorResult<InspectionReport> {
        Ok(InspectionReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            top_tables: self.top_tables_by_row_count(limit).await?,
            engines: self.list_tables_by_engine().await?,
            fragmentation: self.top_fragmented_tables(limit).await?,
        })
    }

    /// Check that the catalog answers within the deadline.
    pub async fn ping(&self) -> InspectorResult<()> {
        self.with_deadline(self.catalog.ping()).await
    }

    async fn run<T>(
        &self,
        report: ReportKind,
        query: CatalogFuture<'_, Vec<T>>,
    ) -> InspectorResult<Vec<T>> {
        let timer = Timer::new();
        let result = self.with_deadline(query).await;

        match &result {
            Ok(records) => Logger::event(
                Event::QueryComplete,
                &[
                    ("report", report.as_str()),
                    ("rows", &records.len().to_string()),
                    ("elapsed_ms", &timer.elapsed_ms()),
                ],
            ),
            Err(e) => Logger::event(
                Event::QueryFailed,
                &[
                    ("report", report.as_str()),
                    ("kind", e.kind()),
                    ("reason", &e.to_string()),
                    ("elapsed_ms", &timer.elapsed_ms()),
                ],
            ),
        }

        result
    }

    async fn with_deadline<T>(
        &self,
        query: impl Future<Output = InspectorResult<T>>,
    ) -> InspectorResult<T> {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => result,
            Err(_) => Err(InspectorError::Timeout(self.query_timeout)),
        }
    }
}
