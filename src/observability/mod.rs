//! Observability for mysql-inspector
//!
//! Structured JSON log lines, one per event. Logging is synchronous, has no
//! side effects on request handling and never returns an error to callers.
//!
//! ```ignore
//! use mysql_inspector::observability::{Event, Logger, Timer};
//!
//! let timer = Timer::new();
//! // ... run a catalog query ...
//! Logger::event(Event::QueryComplete, &[("report", "top_tables"), ("elapsed_ms", &timer.elapsed_ms())]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity, Timer};
