//! `ProductCatalogPort` implementation for `CopernicusClient`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sds_core::{
    CatalogError, Credentials, Footprint, ProductCatalogPort, ProductMetadata, ProductSummary,
};

use crate::client::CopernicusClient;
use crate::error::CopernicusError;

/// Convert internal `CopernicusError` to core `CatalogError`.
pub(crate) fn map_error(err: CopernicusError) -> CatalogError {
    match err {
        CopernicusError::ProductNotFound { id } => CatalogError::NotFound(id),
        CopernicusError::ApiRequestFailed { status, url } => match status {
            404 => CatalogError::NotFound(url),
            401 => CatalogError::Unauthorized,
            _ => CatalogError::InvalidResponse(format!("HTTP {status} from {url}")),
        },
        CopernicusError::Unauthorized => CatalogError::Unauthorized,
        CopernicusError::LtaTriggered { id } => CatalogError::LtaTriggered(id),
        CopernicusError::LtaError { message, .. } => CatalogError::LtaError(message),
        CopernicusError::Server { message, .. } => CatalogError::Server(message),
        CopernicusError::InvalidChecksum { expected, actual } => {
            CatalogError::InvalidChecksum { expected, actual }
        }
        CopernicusError::InvalidResponse { message } => CatalogError::InvalidResponse(message),
        CopernicusError::Network(e) => CatalogError::Network(e.to_string()),
        CopernicusError::InvalidUrl(e) => CatalogError::InvalidResponse(format!("Invalid URL: {e}")),
        CopernicusError::JsonParse(e) => CatalogError::InvalidResponse(e.to_string()),
        CopernicusError::Io(e) => CatalogError::Io(e.to_string()),
    }
}

#[async_trait]
impl ProductCatalogPort for CopernicusClient {
    async fn product_metadata(
        &self,
        id: &str,
        credentials: &Credentials,
    ) -> Result<ProductMetadata, CatalogError> {
        self.fetch_metadata(id, credentials).await.map_err(map_error)
    }

    async fn download(
        &self,
        id: &str,
        dir: &Path,
        credentials: &Credentials,
    ) -> Result<PathBuf, CatalogError> {
        self.fetch_product(id, dir, credentials)
            .await
            .map_err(map_error)
    }

    async fn search(
        &self,
        footprint: &Footprint,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        credentials: &Credentials,
    ) -> Result<Vec<ProductSummary>, CatalogError> {
        self.search_products(footprint, from, to, credentials)
            .await
            .map_err(map_error)
    }
}
