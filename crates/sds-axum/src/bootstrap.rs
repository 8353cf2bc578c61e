//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the Axum web adapter.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use sds_core::paths::{data_root, grid_file_path};
use sds_core::{GridError, GridService};
use sds_kml::KmlGridParser;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Port the service listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 8000;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins.
    #[default]
    AllowAll,
    /// Allow specific origins.
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// Tiling grid KML file.
    pub grid_path: PathBuf,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Create config with default paths.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self {
            port: DEFAULT_PORT,
            grid_path: grid_file_path()?,
            cors: CorsConfig::default(),
        })
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_grid_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.grid_path = path.into();
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// Grid queries, loaded on first use.
    pub grid: Arc<GridService>,
}

impl AxumContext {
    pub fn new(grid: Arc<GridService>) -> Self {
        Self { grid }
    }
}

/// Wire the KML parser into the grid service.
///
/// The grid is loaded eagerly when present. A missing grid file is not an
/// error here: queries answer `503` until `fetch-grid` has run.
pub async fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    info!(
        target: "sds.paths",
        data_root = %data_root()?.display(),
        grid_file = %config.grid_path.display(),
        "Axum bootstrap resolved paths"
    );

    let grid = Arc::new(GridService::new(
        config.grid_path.clone(),
        Arc::new(KmlGridParser::new()),
    ));

    match grid.load_grid().await {
        Ok(_) => {}
        Err(e @ GridError::Unavailable { .. }) => warn!("{e}"),
        Err(e) => return Err(e.into()),
    }

    Ok(AxumContext::new(grid))
}

/// Bootstrap and serve until Ctrl-C.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let ctx = bootstrap(&config).await?;
    let app = crate::routes::create_router(ctx, &config.cors);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Satellite data service listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;
    Ok(())
}
