//! Product catalogue port.
//!
//! Abstracts the Copernicus hub: metadata lookup, archive download and
//! footprint search. Credentials travel with every call so one client can
//! serve several accounts.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{Credentials, Footprint, ProductMetadata, ProductSummary};

/// Errors that can occur during catalogue operations.
///
/// Several variants are expected outcomes of a download attempt rather than
/// faults; the scheduler maps each to a request state.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product with this id exists.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// The hub rejected the credentials.
    #[error("Unauthorized: check the Copernicus username and password")]
    Unauthorized,

    /// The product is offline and its retrieval from the long-term archive has started.
    #[error("Product {0} is offline, retrieval from the long-term archive was triggered")]
    LtaTriggered(String),

    /// The long-term archive refused the retrieval (quota or outage).
    #[error("Long-term archive request failed: {0}")]
    LtaError(String),

    /// The hub answered with a server error.
    #[error("Server error: {0}")]
    Server(String),

    /// The downloaded archive does not match the published checksum.
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    InvalidChecksum { expected: String, actual: String },

    /// Transport failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The hub answered with something we could not read.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Local file error while storing a download.
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Port for querying and downloading catalogue products.
#[async_trait]
pub trait ProductCatalogPort: Send + Sync {
    /// Look up a single product.
    async fn product_metadata(
        &self,
        id: &str,
        credentials: &Credentials,
    ) -> Result<ProductMetadata, CatalogError>;

    /// Download the product archive into `dir` and return its path.
    ///
    /// Offline products are not downloaded; their retrieval is triggered and
    /// `CatalogError::LtaTriggered` is returned.
    async fn download(
        &self,
        id: &str,
        dir: &Path,
        credentials: &Credentials,
    ) -> Result<PathBuf, CatalogError>;

    /// All Level-1C products whose footprint intersects `footprint` and whose
    /// sensing started between `from` and `to`.
    async fn search(
        &self,
        footprint: &Footprint,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        credentials: &Credentials,
    ) -> Result<Vec<ProductSummary>, CatalogError>;
}
