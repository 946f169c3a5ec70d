//! MySQL-backed catalog
//!
//! Runs the ranking queries against `information_schema.TABLES`, scoped to
//! the connection's default database. One pool is opened at startup and
//! shared by every request.

use std::num::NonZeroUsize;

use mysql_async::prelude::*;
use mysql_async::{Opts, OptsBuilder, Pool};
use serde::{Deserialize, Serialize};

use super::catalog::{CatalogFuture, CatalogSource};
use super::errors::{InspectorError, InspectorResult};
use super::policy::EnginePolicy;
use super::records::{EngineRecord, FragmentationRecord, TableRowRecord};

/// MySQL connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MysqlConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_password")]
    pub password: String,
    /// Schema every report is scoped to
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    3306
}

fn default_user() -> String {
    "root".to_string()
}

fn default_password() -> String {
    "root".to_string()
}

fn default_database() -> String {
    "mysql".to_string()
}

impl Default for MysqlConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: default_user(),
            password: default_password(),
            database: default_database(),
        }
    }
}

impl MysqlConfig {
    /// Connection target with the password left out, for logs and output.
    pub fn display_url(&self) -> String {
        format!(
            "mysql://{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }

    pub fn to_opts(&self) -> Opts {
        let mut builder = OptsBuilder::default()
            .ip_or_hostname(self.host.as_str())
            .tcp_port(self.port)
            .user(Some(self.user.as_str()))
            .db_name(Some(self.database.as_str()));

        if !self.password.is_empty() {
            builder = builder.pass(Some(self.password.as_str()));
        }

        builder.into()
    }
}

// Table names are ordered byte-wise so ties break the same way as the
// in-memory ranking, whatever the column collation.
const TOP_TABLES_SQL: &str = "\
SELECT TABLE_NAME, IFNULL(TABLE_ROWS, 0) \
FROM information_schema.TABLES \
WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE' \
ORDER BY IFNULL(TABLE_ROWS, 0) DESC, CAST(TABLE_NAME AS BINARY) ASC \
LIMIT ?";

// The sort key is the ratio in hundredths, rounded half-up in integer
// arithmetic exactly as `ratio_hundredths` does.
const FRAGMENTATION_SQL: &str = "\
SELECT TABLE_SCHEMA, TABLE_NAME, IFNULL(ENGINE, ''), IFNULL(DATA_FREE, 0), DATA_LENGTH \
FROM information_schema.TABLES \
WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE' AND DATA_LENGTH > 0 \
ORDER BY (IFNULL(DATA_FREE, 0) * 20000 + DATA_LENGTH) DIV (2 * DATA_LENGTH) DESC, \
DATA_LENGTH DESC, CAST(TABLE_NAME AS BINARY) ASC \
LIMIT ?";

/// Engine listing SQL; the sort key is rendered from the policy and the cap
/// is bound as a parameter.
fn engine_sql(policy: &EnginePolicy) -> String {
    format!(
        "SELECT TABLE_SCHEMA, TABLE_NAME, IFNULL(ENGINE, ''), IFNULL(TABLE_ROWS, 0), \
         IFNULL(DATA_LENGTH, 0), IFNULL(INDEX_LENGTH, 0) \
         FROM information_schema.TABLES \
         WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE' \
         ORDER BY {} \
         LIMIT ?",
        policy.sort_key.order_by()
    )
}

/// Catalog backed by a `mysql_async` pool.
pub struct MySqlCatalog {
    pool: Pool,
}

impl MySqlCatalog {
    /// Open a pool and ping the server once.
    pub async fn connect(config: &MysqlConfig) -> InspectorResult<Self> {
        let pool = Pool::new(config.to_opts());
        let mut conn = pool
            .get_conn()
            .await
            .map_err(|e| InspectorError::Connect(e.to_string()))?;
        conn.ping()
            .await
            .map_err(|e| InspectorError::Connect(e.to_string()))?;
        drop(conn);

        Ok(Self { pool })
    }

    /// Close all pooled connections.
    pub async fn disconnect(self) -> InspectorResult<()> {
        self.pool.disconnect().await?;
        Ok(())
    }

    async fn fetch_top_tables(&self, limit: NonZeroUsize) -> InspectorResult<Vec<TableRowRecord>> {
        let mut conn = self.pool.get_conn().await?;
        let rows: Vec<(String, u64)> = conn.exec(TOP_TABLES_SQL, (limit.get() as u64,)).await?;

        Ok(rows
            .into_iter()
            .map(|(name, row_count)| TableRowRecord { name, row_count })
            .collect())
    }

    async fn fetch_engines(&self, policy: EnginePolicy) -> InspectorResult<Vec<EngineRecord>> {
        let sql = engine_sql(&policy);
        let mut conn = self.pool.get_conn().await?;
        let rows: Vec<(String, String, String, u64, u64, u64)> = conn
            .exec(sql.as_str(), (policy.max_results.get() as u64,))
            .await?;

        Ok(rows
            .into_iter()
            .map(
                |(schema, name, engine, row_count, data_length, index_length)| EngineRecord {
                    schema,
                    name,
                    engine,
                    row_count,
                    data_length,
                    index_length,
                },
            )
            .collect())
    }

    async fn fetch_fragmentation(
        &self,
        limit: NonZeroUsize,
    ) -> InspectorResult<Vec<FragmentationRecord>> {
        let mut conn = self.pool.get_conn().await?;
        let rows: Vec<(String, String, String, u64, u64)> =
            conn.exec(FRAGMENTATION_SQL, (limit.get() as u64,)).await?;

        // DATA_LENGTH > 0 is enforced in SQL; the ratio is computed here so
        // it follows the same rounding as every other source.
        Ok(rows
            .into_iter()
            .filter_map(|(schema, name, engine, data_free, data_length)| {
                FragmentationRecord::new(schema, name, engine, data_free, data_length)
            })
            .collect())
    }

    async fn ping_server(&self) -> InspectorResult<()> {
        let mut conn = self.pool.get_conn().await?;
        conn.ping().await?;
        Ok(())
    }
}

impl CatalogSource for MySqlCatalog {
    fn top_tables_by_row_count(&self, limit: NonZeroUsize) -> CatalogFuture<'_, Vec<TableRowRecord>> {
        Box::pin(self.fetch_top_tables(limit))
    }

    fn tables_by_engine(&self, policy: EnginePolicy) -> CatalogFuture<'_, Vec<EngineRecord>> {
        Box::pin(self.fetch_engines(policy))
    }

    fn top_fragmented_tables(
        &self,
        limit: NonZeroUsize,
    ) -> CatalogFuture<'_, Vec<FragmentationRecord>> {
        Box::pin(self.fetch_fragmentation(limit))
    }

    fn ping(&self) -> CatalogFuture<'_, ()> {
        Box::pin(self.ping_server())
    }
}
