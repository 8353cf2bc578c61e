//! Public configuration for the Copernicus client.

use std::time::Duration;

/// Environment variable overriding the hub base URL.
pub const COPERNICUS_URL_ENV: &str = "SDS_COPERNICUS_URL";

/// Default hub base URL.
pub const DEFAULT_API_URL: &str = "https://apihub.copernicus.eu/apihub";

/// Configuration for the Copernicus client.
///
/// # Example
///
/// ```
/// use sds_copernicus::CopernicusConfig;
/// use std::time::Duration;
///
/// let config = CopernicusConfig::new()
///     .with_api_url("https://scihub.example.org/dhus")
///     .with_timeout(Duration::from_secs(60));
/// assert_eq!(config.search_url(), "https://scihub.example.org/dhus/search");
/// ```
#[derive(Debug, Clone)]
pub struct CopernicusConfig {
    pub(crate) api_url: String,
    pub(crate) search_url: Option<String>,
    pub(crate) user_agent: String,
    /// Timeout for metadata and search calls. Archive downloads have none.
    pub(crate) timeout: Duration,
    pub(crate) max_retries: u8,
    pub(crate) retry_base_delay: Duration,
    pub(crate) page_size: u32,
}

impl Default for CopernicusConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            search_url: None,
            user_agent: concat!("sds-copernicus/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
            page_size: 100,
        }
    }
}

impl CopernicusConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with `SDS_COPERNICUS_URL` applied when set and non-blank.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(COPERNICUS_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new().with_api_url(url.trim()),
            _ => Self::new(),
        }
    }

    /// Set the hub base URL. A trailing slash is dropped.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the OpenSearch endpoint. Defaults to `<api_url>/search`.
    #[must_use]
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Retries for transient errors on metadata and search calls.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Base delay for exponential backoff.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Search results fetched per page.
    #[must_use]
    pub fn with_page_size(mut self, rows: u32) -> Self {
        self.page_size = rows.max(1);
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn search_url(&self) -> String {
        self.search_url
            .clone()
            .unwrap_or_else(|| format!("{}/search", self.api_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CopernicusConfig::new();
        assert_eq!(config.api_url(), DEFAULT_API_URL);
        assert_eq!(
            config.search_url(),
            "https://apihub.copernicus.eu/apihub/search"
        );
        assert_eq!(config.page_size, 100);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn explicit_search_url_wins() {
        let config = CopernicusConfig::new()
            .with_api_url("http://localhost:8080/")
            .with_search_url("http://localhost:9090/os");
        assert_eq!(config.api_url(), "http://localhost:8080");
        assert_eq!(config.search_url(), "http://localhost:9090/os");
    }

    #[test]
    fn page_size_is_at_least_one() {
        assert_eq!(CopernicusConfig::new().with_page_size(0).page_size, 1);
    }
}
