//! Configuration file
//!
//! JSON, loaded from `config.json` unless `--config` says otherwise. A
//! missing file means "use defaults"; a file that exists but cannot be read
//! or parsed is fatal.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;
use crate::inspector::MysqlConfig;

/// Default configuration path, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// `server_port`, `bind_host` and `index_path`
    #[serde(flatten)]
    pub http: HttpServerConfig,

    /// Deadline for each catalog query (default: 5000)
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    #[serde(default)]
    pub mysql: MysqlConfig,
}

fn default_query_timeout_ms() -> u64 {
    5000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpServerConfig::default(),
            query_timeout_ms: default_query_timeout_ms(),
            mysql: MysqlConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from `path` if it exists, otherwise return defaults
    pub fn load_or_default(path: &Path) -> CliResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> CliResult<()> {
        self.http.validate().map_err(CliError::config_error)?;

        if self.query_timeout_ms == 0 {
            return Err(CliError::config_error("query_timeout_ms must be > 0"));
        }

        // Reports are scoped to DATABASE(); without one they are always empty
        if self.mysql.database.trim().is_empty() {
            return Err(CliError::config_error("mysql.database must not be empty"));
        }

        Ok(())
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

}
