//! Catalog sources
//!
//! A [`CatalogSource`] answers the three ranking queries for the schema it
//! is bound to. Futures are boxed so sources can sit behind `Arc<dyn _>`.

use std::future::Future;
use std::num::NonZeroUsize;
use std::pin::Pin;

use super::errors::InspectorResult;
use super::policy::{rank_by_engine, rank_by_fragmentation, rank_by_row_count, EnginePolicy};
use super::records::{CatalogTable, EngineRecord, FragmentationRecord, TableRowRecord};

/// Boxed future returned by catalog sources
pub type CatalogFuture<'a, T> = Pin<Box<dyn Future<Output = InspectorResult<T>> + Send + 'a>>;

/// Read-only access to one schema's table metadata.
///
/// Implementations must be safe to call concurrently and must return records
/// already ranked and bounded.
pub trait CatalogSource: Send + Sync {
    /// Tables by row-count estimate, descending.
    fn top_tables_by_row_count(&self, limit: NonZeroUsize) -> CatalogFuture<'_, Vec<TableRowRecord>>;

    /// Tables sorted and capped by the engine policy.
    fn tables_by_engine(&self, policy: EnginePolicy) -> CatalogFuture<'_, Vec<EngineRecord>>;

    /// Tables with data, by fragmentation ratio descending.
    fn top_fragmented_tables(
        &self,
        limit: NonZeroUsize,
    ) -> CatalogFuture<'_, Vec<FragmentationRecord>>;

    /// Verify the catalog is reachable.
    fn ping(&self) -> CatalogFuture<'_, ()>;
}

/// In-memory catalog bound to a single schema.
///
/// Rows belonging to other schemas are ignored, mirroring
/// `TABLE_SCHEMA = DATABASE()`.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    schema: String,
    tables: Vec<CatalogTable>,
}

impl MemoryCatalog {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            tables: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: CatalogTable) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_tables(mut self, tables: impl IntoIterator<Item = CatalogTable>) -> Self {
        self.tables.extend(tables);
        self
    }

    /// A small sample schema used by `report --demo`.
    pub fn demo() -> Self {
        let schema = "shop";
        Self::new(schema).with_tables([
            CatalogTable::new(schema, "orders", "InnoDB")
                .with_rows(1_204_331)
                .with_storage(402_653_184, 96_468_992, 41_943_040),
            CatalogTable::new(schema, "order_items", "InnoDB")
                .with_rows(3_877_120)
                .with_storage(805_306_368, 201_326_592, 7_340_032),
            CatalogTable::new(schema, "customers", "InnoDB")
                .with_rows(88_214)
                .with_storage(16_269_312, 5_783_552, 4_194_304),
            CatalogTable::new(schema, "audit_log", "MyISAM")
                .with_rows(512_000)
                .with_storage(73_400_320, 10_485_760, 0),
            CatalogTable::new(schema, "session_cache", "MEMORY")
                .with_rows(1_024)
                .with_storage(131_072, 0, 0),
            CatalogTable::new(schema, "archived_carts", "ARCHIVE").with_rows(45_000),
            CatalogTable::new(schema, "coupons", "InnoDB")
                .with_rows(0)
                .with_storage(16_384, 0, 0),
        ])
    }

    fn scoped(&self) -> Vec<CatalogTable> {
        self.tables
            .iter()
            .filter(|t| t.schema == self.schema)
            .cloned()
            .collect()
    }
}

impl CatalogSource for MemoryCatalog {
    fn top_tables_by_row_count(&self, limit: NonZeroUsize) -> CatalogFuture<'_, Vec<TableRowRecord>> {
        Box::pin(async move { Ok(rank_by_row_count(&self.scoped(), limit)) })
    }

    fn tables_by_engine(&self, policy: EnginePolicy) -> CatalogFuture<'_, Vec<EngineRecord>> {
        Box::pin(async move { Ok(rank_by_engine(&self.scoped(), &policy)) })
    }

    fn top_fragmented_tables(
        &self,
        limit: NonZeroUsize,
    ) -> CatalogFuture<'_, Vec<FragmentationRecord>> {
        Box::pin(async move { Ok(rank_by_fragmentation(&self.scoped(), limit)) })
    }

    fn ping(&self) -> CatalogFuture<'_, ()> {
        Box::pin(async { Ok(()) })
    }
}
