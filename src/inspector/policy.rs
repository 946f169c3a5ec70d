//! Ranking policies
//!
//! Each report pairs a sort order with a bound on result count. The MySQL
//! catalog pushes both into SQL; the in-memory catalog applies the same
//! rules with the functions below.

use std::cmp::Ordering;
use std::num::NonZeroUsize;

use super::records::{
    CatalogTable, EngineRecord, FragmentationRecord, TableRowRecord,
};

/// Engine name treated as the standard storage engine
pub const INNODB: &str = "InnoDB";

/// Default bound for every report
pub const DEFAULT_LIMIT: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(n) => n,
    None => panic!("default limit must be non-zero"),
};

/// Sort order for the engine listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineSortKey {
    /// Non-InnoDB tables first, then table name ascending.
    NonInnoDbThenName,
}

impl EngineSortKey {
    /// `ORDER BY` body for `information_schema.TABLES`.
    pub fn order_by(&self) -> &'static str {
        match self {
            // FALSE (non-InnoDB) sorts before TRUE
            Self::NonInnoDbThenName => "IFNULL(ENGINE, '') = 'InnoDB' ASC, CAST(TABLE_NAME AS BINARY) ASC",
        }
    }

    pub fn compare(&self, a: &EngineRecord, b: &EngineRecord) -> Ordering {
        match self {
            Self::NonInnoDbThenName => a
                .is_innodb()
                .cmp(&b.is_innodb())
                .then_with(|| a.name.cmp(&b.name)),
        }
    }
}

/// Engine listing policy: an unconditional cap applied after sorting.
///
/// The cap is not a filter. A schema with more than `max_results` tables, all
/// InnoDB, still yields `max_results` InnoDB rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnginePolicy {
    pub max_results: NonZeroUsize,
    pub sort_key: EngineSortKey,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_LIMIT,
            sort_key: EngineSortKey::NonInnoDbThenName,
        }
    }
}

/// Row-count estimate descending, table name ascending on ties.
pub fn rank_by_row_count(tables: &[CatalogTable], limit: NonZeroUsize) -> Vec<TableRowRecord> {
    let mut records: Vec<TableRowRecord> = tables.iter().map(CatalogTable::to_row_record).collect();
    records.sort_by(|a, b| {
        b.row_count
            .cmp(&a.row_count)
            .then_with(|| a.name.cmp(&b.name))
    });
    records.truncate(limit.get());
    records
}

/// Sort by the policy's key, then cap.
pub fn rank_by_engine(tables: &[CatalogTable], policy: &EnginePolicy) -> Vec<EngineRecord> {
    let mut records: Vec<EngineRecord> = tables.iter().map(CatalogTable::to_engine_record).collect();
    records.sort_by(|a, b| policy.sort_key.compare(a, b));
    records.truncate(policy.max_results.get());
    records
}

/// Ratio descending, then data length descending, then table name ascending.
/// Tables with zero data length are dropped.
pub fn rank_by_fragmentation(
    tables: &[CatalogTable],
    limit: NonZeroUsize,
) -> Vec<FragmentationRecord> {
    let mut records: Vec<FragmentationRecord> = tables
        .iter()
        .filter_map(CatalogTable::to_fragmentation_record)
        .collect();
    records.sort_by(|a, b| {
        b.fragmentation_ratio
            .total_cmp(&a.fragmentation_ratio)
            .then_with(|| b.data_length_bytes.cmp(&a.data_length_bytes))
            .then_with(|| a.name.cmp(&b.name))
    });
    records.truncate(limit.get());
    records
}
