//! Scheduler errors.

use std::path::PathBuf;

use sds_core::{CatalogError, PathError, QueryState, RepositoryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("There is no request with id {0}")]
    UnknownRequest(String),

    #[error("Only requests of state available may be processed - actual state was {state}")]
    NotAvailable { id: String, state: QueryState },

    #[error("Product archive {} does not exist", .0.display())]
    ArchiveMissing(PathBuf),

    #[error("Failed to extract archive: {0}")]
    Archive(String),

    #[error("Failed to read product metadata: {0}")]
    Metadata(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
