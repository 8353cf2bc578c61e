//! Serve command handler.

use std::path::PathBuf;

use sds_axum::{ServerConfig, start_server};

use crate::error::CliError;

/// Run the HTTP service until Ctrl-C.
pub async fn execute(
    port: u16,
    grid: Option<PathBuf>,
    allowed_origins: Vec<String>,
) -> Result<(), CliError> {
    let mut config = ServerConfig::with_defaults()
        .map_err(|e| CliError::Config(format!("{e:#}")))?
        .with_port(port);
    if let Some(grid) = grid {
        config = config.with_grid_path(grid);
    }
    if !allowed_origins.is_empty() {
        config = config.with_allowed_origins(allowed_origins);
    }

    start_server(config)
        .await
        .map_err(|e| CliError::Core(format!("{e:#}")))
}
