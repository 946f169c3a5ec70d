//! # HTTP Server Module
//!
//! Request handlers for the inspector reports plus the dashboard page.
//!
//! # Endpoints
//!
//! - `GET /api/tables/top` - largest tables by row estimate
//! - `GET /api/tables/non-innodb` - tables by engine, non-InnoDB first
//! - `GET /api/tables/fragmentation` - most fragmented tables
//! - `GET /health` - version and catalog reachability
//! - `GET /` - static dashboard page

pub mod config;
pub mod errors;
pub mod inspector_routes;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::ErrorEnvelope;
pub use inspector_routes::{InspectorState, ALLOW_HEADERS, ALLOW_METHODS, ALLOW_ORIGIN};
pub use server::HttpServer;
