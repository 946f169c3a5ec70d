//! CLI command implementations
//!
//! The composition root: configuration is loaded here, the MySQL pool is
//! opened exactly once, and the resulting [`Inspector`] is handed to the
//! HTTP server. Nothing below this layer looks up global state.

use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use crate::http_server::HttpServer;
use crate::inspector::{CatalogSource, Inspector, MemoryCatalog, MySqlCatalog};
use crate::observability::{Event, Logger};

use super::args::Command;
use super::config::AppConfig;
use super::errors::{CliError, CliResult};

/// Dispatch a parsed command
pub async fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve { config } => serve(&config).await,
        Command::Report {
            config,
            limit,
            demo,
        } => report(&config, limit, demo, &mut io::stdout()).await,
        Command::Check { config } => check(&config, &mut io::stdout()).await,
    }
}

/// Start the HTTP server and serve until it stops
pub async fn serve(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let catalog = connect(&config).await?;

    let inspector =
        Inspector::new(Arc::new(catalog)).with_query_timeout(config.query_timeout());
    let server = HttpServer::with_config(config.http.clone(), inspector);

    server.start().await.map_err(|e| {
        Logger::event(Event::StartupFailed, &[("reason", &e.to_string())]);
        CliError::boot_failed(format!("HTTP server failed: {}", e))
    })
}

/// Run every report once and write them to `out` as one JSON object
pub async fn report(
    config_path: &Path,
    limit: NonZeroUsize,
    demo: bool,
    out: &mut dyn Write,
) -> CliResult<()> {
    let config = load_config(config_path)?;

    let catalog: Arc<dyn CatalogSource> = if demo {
        Arc::new(MemoryCatalog::demo())
    } else {
        Arc::new(connect(&config).await?)
    };

    let inspector = Inspector::new(catalog).with_query_timeout(config.query_timeout());
    let report = inspector.full_report(limit).await?;

    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

/// Connect, ping, and report the target
pub async fn check(config_path: &Path, out: &mut dyn Write) -> CliResult<()> {
    let config = load_config(config_path)?;
    let catalog = connect(&config).await?;

    writeln!(out, "connected to {}", config.mysql.display_url())?;
    catalog.disconnect().await?;
    Ok(())
}

fn load_config(path: &Path) -> CliResult<AppConfig> {
    let source = if path.exists() { "file" } else { "defaults" };
    let config = AppConfig::load_or_default(path)?;

    Logger::event(
        Event::ConfigLoaded,
        &[
            ("path", &path.display().to_string()),
            ("source", source),
        ],
    );
    Ok(config)
}

async fn connect(config: &AppConfig) -> CliResult<MySqlCatalog> {
    let target = config.mysql.display_url();

    match MySqlCatalog::connect(&config.mysql).await {
        Ok(catalog) => {
            Logger::event(Event::MysqlConnected, &[("target", &target)]);
            Ok(catalog)
        }
        Err(e) => {
            Logger::event(
                Event::StartupFailed,
                &[("reason", &e.to_string()), ("target", &target)],
            );
            Err(e.into())
        }
    }
}
