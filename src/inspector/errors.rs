//! Inspector error types

use std::time::Duration;

use thiserror::Error;

/// Result alias for catalog operations
pub type InspectorResult<T> = Result<T, InspectorError>;

/// Errors raised while querying the schema catalog.
///
/// Every variant is terminal for the request that triggered it; nothing is
/// retried and no partial result is returned alongside an error.
#[derive(Debug, Error)]
pub enum InspectorError {
    /// The catalog could not be reached or opened at startup.
    #[error("connection failed: {0}")]
    Connect(String),

    /// A catalog query failed.
    #[error("query failed: {0}")]
    Query(String),

    /// A catalog query ran past its deadline.
    #[error("query timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Records could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl InspectorError {
    /// Stable machine-readable kind, used in error envelopes and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connect(_) => "connection_failed",
            Self::Query(_) => "query_failed",
            Self::Timeout(_) => "query_timeout",
            Self::Serialization(_) => "serialization_failed",
        }
    }
}

impl From<mysql_async::Error> for InspectorError {
    fn from(e: mysql_async::Error) -> Self {
        Self::Query(e.to_string())
    }
}

impl From<serde_json::Error> for InspectorError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
