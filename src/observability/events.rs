//! Lifecycle and query events
//!
//! Every log line the inspector writes is named by one of these events.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration resolved (from file or defaults)
    ConfigLoaded,
    /// Connection pool opened and pinged
    MysqlConnected,
    /// HTTP listener bound
    ServerListening,
    /// Startup aborted (FATAL)
    StartupFailed,

    // Catalog queries
    /// A report query returned its records
    QueryComplete,
    /// A report query failed or timed out
    QueryFailed,
}

impl Event {
    /// Returns the event name as written to the log
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::MysqlConnected => "MYSQL_CONNECTED",
            Event::ServerListening => "SERVER_LISTENING",
            Event::StartupFailed => "STARTUP_FAILED",
            Event::QueryComplete => "QUERY_COMPLETE",
            Event::QueryFailed => "QUERY_FAILED",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::StartupFailed)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Event::QueryFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
