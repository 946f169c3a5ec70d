//! # HTTP Server
//!
//! Combines the inspector, health and dashboard routes into one router.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeFile;

use super::config::HttpServerConfig;
use super::inspector_routes::{inspector_routes, InspectorState};
use super::observability_routes::health_routes;
use crate::inspector::Inspector;
use crate::observability::{Event, Logger};

/// HTTP server for the inspector dashboard
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server with default configuration
    pub fn new(inspector: Inspector) -> Self {
        Self::with_config(HttpServerConfig::default(), inspector)
    }

    /// Create a server with custom configuration
    pub fn with_config(config: HttpServerConfig, inspector: Inspector) -> Self {
        let router = Self::build_router(&config, inspector);
        Self { config, router }
    }

    fn build_router(config: &HttpServerConfig, inspector: Inspector) -> Router {
        let state = Arc::new(InspectorState::new(inspector));

        Router::new()
            // Health check at root level
            .merge(health_routes(state.clone()))
            // Report endpoints under /api
            .nest("/api", inspector_routes(state))
            // Dashboard page; 404 when the file is missing
            .route_service("/", ServeFile::new(&config.index_path))
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the listener fails
    pub async fn start(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.socket_addr()).await?;
        let local_addr = listener.local_addr()?;

        Logger::event(
            Event::ServerListening,
            &[
                ("addr", &local_addr.to_string()),
                ("index_path", &self.config.index_path),
            ],
        );

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
