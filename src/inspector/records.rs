//! Catalog records
//!
//! Typed rows produced by the three ranking reports, plus the raw catalog
//! row shape used by in-memory sources. Records are built once per request
//! and never mutated afterwards.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// One table ranked by its row-count estimate.
///
/// `row_count` is the storage engine's estimate (`TABLE_ROWS`), not an
/// exact `COUNT(*)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRowRecord {
    #[serde(rename = "table_name")]
    pub name: String,
    pub row_count: u64,
}

/// One table annotated with its storage engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineRecord {
    #[serde(rename = "table_schema")]
    pub schema: String,
    #[serde(rename = "table_name")]
    pub name: String,
    pub engine: String,
    pub row_count: u64,
    pub data_length: u64,
    pub index_length: u64,
}

impl EngineRecord {
    /// Whether the table uses InnoDB. Engine names compare case-insensitively,
    /// matching the catalog's collation.
    pub fn is_innodb(&self) -> bool {
        is_innodb(&self.engine)
    }
}

/// One table ranked by free-space fragmentation.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentationRecord {
    pub schema: String,
    pub name: String,
    pub engine: String,
    pub data_free_bytes: u64,
    pub data_length_bytes: u64,
    /// `data_free_bytes * 100 / data_length_bytes`, rounded to two decimals.
    pub fragmentation_ratio: f64,
}

impl FragmentationRecord {
    /// Build a record, computing the ratio.
    ///
    /// Returns `None` when `data_length_bytes` is zero: the ratio is
    /// undefined there and such tables are not reported at all.
    pub fn new(
        schema: impl Into<String>,
        name: impl Into<String>,
        engine: impl Into<String>,
        data_free_bytes: u64,
        data_length_bytes: u64,
    ) -> Option<Self> {
        let fragmentation_ratio = fragmentation_ratio(data_free_bytes, data_length_bytes)?;
        Some(Self {
            schema: schema.into(),
            name: name.into(),
            engine: engine.into(),
            data_free_bytes,
            data_length_bytes,
            fragmentation_ratio,
        })
    }
}

impl Serialize for FragmentationRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FragmentationRecord", 7)?;
        state.serialize_field("table_schema", &self.schema)?;
        state.serialize_field("table_name", &self.name)?;
        state.serialize_field("engine", &self.engine)?;
        state.serialize_field("data_free", &self.data_free_bytes)?;
        state.serialize_field("data_length", &self.data_length_bytes)?;
        state.serialize_field("fragment_ratio", &self.fragmentation_ratio)?;
        // Reclaimable bytes, kept for dashboard compatibility.
        state.serialize_field("fragment_size", &self.data_free_bytes)?;
        state.end()
    }
}

/// Percentage of allocated data space that is free, rounded half-up to two
/// decimals.
///
/// `None` when `data_length` is zero.
pub fn fragmentation_ratio(data_free: u64, data_length: u64) -> Option<f64> {
    ratio_hundredths(data_free, data_length).map(|h| h as f64 / 100.0)
}

/// The ratio in hundredths of a percent, rounded half-up on the exact
/// quotient. Matches the `DIV` sort key in the MySQL queries.
pub fn ratio_hundredths(data_free: u64, data_length: u64) -> Option<u128> {
    if data_length == 0 {
        return None;
    }
    let free = u128::from(data_free);
    let length = u128::from(data_length);
    Some((free * 20_000 + length) / (2 * length))
}

pub(crate) fn is_innodb(engine: &str) -> bool {
    engine.eq_ignore_ascii_case(super::policy::INNODB)
}

/// A raw `information_schema.TABLES` row as an in-memory catalog holds it.
///
/// Nullable catalog columns stay optional here; ranking coalesces them to
/// `""` / `0` the same way the SQL path does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTable {
    pub schema: String,
    pub name: String,
    pub engine: Option<String>,
    pub table_rows: Option<u64>,
    pub data_length: Option<u64>,
    pub index_length: Option<u64>,
    pub data_free: Option<u64>,
}

impl CatalogTable {
    /// Create a table row with no statistics.
    pub fn new(schema: impl Into<String>, name: impl Into<String>, engine: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            engine: Some(engine.into()),
            table_rows: None,
            data_length: None,
            index_length: None,
            data_free: None,
        }
    }

    /// Set the row-count estimate
    pub fn with_rows(mut self, rows: u64) -> Self {
        self.table_rows = Some(rows);
        self
    }

    /// Set data, index and free byte counts
    pub fn with_storage(mut self, data_length: u64, index_length: u64, data_free: u64) -> Self {
        self.data_length = Some(data_length);
        self.index_length = Some(index_length);
        self.data_free = Some(data_free);
        self
    }

    pub fn engine_name(&self) -> &str {
        self.engine.as_deref().unwrap_or("")
    }

    pub fn rows(&self) -> u64 {
        self.table_rows.unwrap_or(0)
    }

    pub fn data_length_bytes(&self) -> u64 {
        self.data_length.unwrap_or(0)
    }

    pub fn data_free_bytes(&self) -> u64 {
        self.data_free.unwrap_or(0)
    }

    pub fn to_row_record(&self) -> TableRowRecord {
        TableRowRecord {
            name: self.name.clone(),
            row_count: self.rows(),
        }
    }

    pub fn to_engine_record(&self) -> EngineRecord {
        EngineRecord {
            schema: self.schema.clone(),
            name: self.name.clone(),
            engine: self.engine_name().to_string(),
            row_count: self.rows(),
            data_length: self.data_length_bytes(),
            index_length: self.index_length.unwrap_or(0),
        }
    }

    pub fn to_fragmentation_record(&self) -> Option<FragmentationRecord> {
        FragmentationRecord::new(
            self.schema.clone(),
            self.name.clone(),
            self.engine_name(),
            self.data_free_bytes(),
            self.data_length_bytes(),
        )
    }
}
