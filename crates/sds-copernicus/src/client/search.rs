//! OpenSearch footprint queries.

use chrono::{DateTime, SecondsFormat, Utc};
use sds_core::{Credentials, Footprint, ProductSummary};
use tracing::debug;
use url::Url;

use super::CopernicusClient;
use crate::error::CopernicusResult;
use crate::parsing::parse_search_page;

const PLATFORM: &str = "Sentinel-2";
const PRODUCT_TYPE: &str = "S2MSI1C";

/// The OpenSearch `q` parameter for Level-1C products over `footprint`.
pub fn build_query(footprint: &Footprint, from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    format!(
        "footprint:\"Intersects({})\" AND beginposition:[{} TO {}] AND platformname:{PLATFORM} AND producttype:{PRODUCT_TYPE}",
        footprint.to_wkt(),
        from.to_rfc3339_opts(SecondsFormat::Millis, true),
        to.to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

impl CopernicusClient {
    /// Collect every page of the query.
    pub(crate) async fn search_products(
        &self,
        footprint: &Footprint,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        credentials: &Credentials,
    ) -> CopernicusResult<Vec<ProductSummary>> {
        let query = build_query(footprint, from, to);
        let rows = self.config.page_size.to_string();
        let mut products = Vec::new();
        let mut start: u64 = 0;

        loop {
            let mut url = Url::parse(&self.config.search_url())?;
            url.query_pairs_mut()
                .append_pair("q", &query)
                .append_pair("rows", &rows)
                .append_pair("start", &start.to_string())
                .append_pair("format", "json");

            let page = parse_search_page(&self.backend.get_json(&url, credentials).await?)?;
            let received = page.products.len() as u64;
            products.extend(page.products);
            debug!(start, received, total = page.total, "Fetched search page");

            if received == 0 || products.len() as u64 >= page.total {
                break;
            }
            start += received;
        }

        Ok(products)
    }
}
