//! CLI module for mysql-inspector
//!
//! Provides command-line interface for:
//! - serve: load config, connect once, serve the HTTP endpoints (default)
//! - report: one-shot JSON dump of all three reports
//! - check: connectivity check against the configured schema

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check, report, run_command, serve};
pub use config::{AppConfig, DEFAULT_CONFIG_PATH};
pub use errors::{CliError, CliErrorCode, CliResult};

/// Parse process arguments and run the selected command
pub async fn run() -> CliResult<()> {
    run_command(Cli::parse_args().into_command()).await
}
