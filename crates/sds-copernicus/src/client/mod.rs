//! Copernicus Open Access Hub client.

mod download;
mod search;

use sds_core::{Credentials, ProductMetadata};
use tracing::debug;
use url::Url;

use crate::config::CopernicusConfig;
use crate::error::{CopernicusError, CopernicusResult};
use crate::http::ReqwestBackend;
use crate::parsing::parse_product_metadata;

pub use search::build_query;

/// Client for the hub's OData and OpenSearch endpoints.
///
/// Credentials are passed per call. Use it through
/// [`ProductCatalogPort`](sds_core::ProductCatalogPort).
pub struct CopernicusClient {
    pub(crate) backend: ReqwestBackend,
    pub(crate) config: CopernicusConfig,
}

impl CopernicusClient {
    /// Create a client with the given configuration.
    pub fn new(config: CopernicusConfig) -> Result<Self, sds_core::CatalogError> {
        let backend = ReqwestBackend::new(&config).map_err(crate::port::map_error)?;
        Ok(Self { backend, config })
    }

    pub const fn config(&self) -> &CopernicusConfig {
        &self.config
    }

    /// `{api}/odata/v1/Products('{id}'){suffix}`.
    pub(crate) fn product_url(&self, id: &str, suffix: &str) -> CopernicusResult<Url> {
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(CopernicusError::ProductNotFound { id: id.to_string() });
        }
        Ok(Url::parse(&format!(
            "{}/odata/v1/Products('{id}'){suffix}",
            self.config.api_url
        ))?)
    }

    pub(crate) async fn fetch_metadata(
        &self,
        id: &str,
        credentials: &Credentials,
    ) -> CopernicusResult<ProductMetadata> {
        let mut url = self.product_url(id, "")?;
        url.set_query(Some("$format=json"));

        let json = match self.backend.get_json(&url, credentials).await {
            Err(CopernicusError::ApiRequestFailed { status: 404, .. }) => {
                return Err(CopernicusError::ProductNotFound { id: id.to_string() });
            }
            other => other?,
        };
        let metadata = parse_product_metadata(&json)?;
        debug!(id, title = %metadata.title, online = metadata.online, "Fetched product metadata");
        Ok(metadata)
    }
}
