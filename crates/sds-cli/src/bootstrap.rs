//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter: the KML grid parser, the Copernicus client and the
//! request scheduler with its JSON store.

use std::path::PathBuf;
use std::sync::Arc;

use sds_copernicus::{CopernicusClient, CopernicusConfig};
use sds_core::paths::grid_file_path;
use sds_core::{GridService, ProductCatalogPort};
use sds_kml::KmlGridParser;
use sds_scheduler::{JsonScheduleStore, RequestScheduler, SchedulerConfig};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Install the tracing subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Grid queries over the KML file at `path`, or the default grid file.
pub fn grid_service(path: Option<PathBuf>) -> Result<GridService, CliError> {
    let path = match path {
        Some(path) => path,
        None => grid_file_path()?,
    };
    Ok(GridService::new(path, Arc::new(KmlGridParser::new())))
}

/// Services for the product commands.
pub struct CliContext {
    pub catalog: Arc<dyn ProductCatalogPort>,
    pub scheduler: RequestScheduler,
}

impl CliContext {
    /// Wire the Copernicus client and open the scheduler.
    pub async fn open() -> Result<Self, CliError> {
        let client = CopernicusClient::new(CopernicusConfig::from_env())?;
        let catalog: Arc<dyn ProductCatalogPort> = Arc::new(client);

        let config = SchedulerConfig::from_env()?;
        let store = Arc::new(JsonScheduleStore::new(config.schedule_path.clone()));
        let scheduler = RequestScheduler::open(Arc::clone(&catalog), store, config).await?;

        Ok(Self { catalog, scheduler })
    }
}
