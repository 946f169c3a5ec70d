//! mysql-inspector - read-only structural health reports for a MySQL schema
//!
//! Three reports over `information_schema.TABLES`, scoped to the schema the
//! connection is bound to, exposed as JSON over HTTP:
//!
//! - largest tables by row-count estimate
//! - tables by storage engine, non-InnoDB first
//! - tables by free-space fragmentation ratio
//!
//! The [`inspector`] module holds the ranking logic and the catalog seam,
//! [`http_server`] the request handlers, and [`cli`] the composition root.

pub mod cli;
pub mod http_server;
pub mod inspector;
pub mod observability;
