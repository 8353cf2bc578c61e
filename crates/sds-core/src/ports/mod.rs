//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.

pub mod grid_parser;
pub mod product_catalog;
pub mod resource_fetcher;
pub mod schedule_repository;

use thiserror::Error;

pub use grid_parser::{GridParseError, GridParserPort};
pub use product_catalog::{CatalogError, ProductCatalogPort};
pub use resource_fetcher::{DownloadError, ProgressCallback, ResourceFetcher};
pub use schedule_repository::{Schedule, ScheduleRepository};

/// Domain-specific errors for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Storage backend error (filesystem).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
