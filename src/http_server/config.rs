//! Listener settings
//!
//! Deserialized straight from the top level of `config.json`
//! (`server_port`, `bind_host`, `index_path`); see `cli::AppConfig`.

use serde::{Deserialize, Serialize};

/// Where the server listens and which page it serves at `/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    #[serde(rename = "bind_host", default = "default_host")]
    pub host: String,

    #[serde(rename = "server_port", default = "default_port")]
    pub port: u16,

    /// A missing file yields 404, not a startup error
    #[serde(default = "default_index_path")]
    pub index_path: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_index_path() -> String {
    "web/index.html".to_string()
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            index_path: default_index_path(),
        }
    }
}

impl HttpServerConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject settings the listener cannot start with.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("server_port must be > 0".to_string());
        }
        if self.host.trim().is_empty() {
            return Err("bind_host must not be empty".to_string());
        }
        if self.index_path.trim().is_empty() {
            return Err("index_path must not be empty".to_string());
        }
        Ok(())
    }
}
