//! HTTP backend for the hub.
//!
//! Every call authenticates with HTTP basic auth. JSON calls are retried with
//! exponential backoff on network errors and 5xx answers; archive downloads
//! are single attempts without a timeout.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use sds_core::Credentials;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::CopernicusConfig;
use crate::error::{CopernicusError, CopernicusResult};
use crate::parsing::parse_error_message;

/// Production HTTP backend using reqwest with retry logic.
pub struct ReqwestBackend {
    client: Client,
    timeout: Duration,
    max_retries: u8,
    retry_base_delay_ms: u64,
}

impl ReqwestBackend {
    pub fn new(config: &CopernicusConfig) -> CopernicusResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            timeout: config.timeout,
            max_retries: config.max_retries,
            #[allow(clippy::cast_possible_truncation)]
            retry_base_delay_ms: config.retry_base_delay.as_millis() as u64,
        })
    }

    fn build_request(&self, url: &Url, credentials: &Credentials) -> reqwest::RequestBuilder {
        self.client
            .get(url.as_str())
            .basic_auth(&credentials.username, Some(&credentials.password))
    }

    /// GET a JSON document, retrying transient failures.
    pub async fn get_json(&self, url: &Url, credentials: &Credentials) -> CopernicusResult<Value> {
        let response = self.fetch_with_retry(url, credentials).await?;
        Ok(response.json().await?)
    }

    /// GET without retries or timeout. The status is not checked.
    pub async fn get(&self, url: &Url, credentials: &Credentials) -> CopernicusResult<Response> {
        Ok(self.build_request(url, credentials).send().await?)
    }

    async fn fetch_with_retry(
        &self,
        url: &Url,
        credentials: &Credentials,
    ) -> CopernicusResult<Response> {
        let mut last_error: Option<CopernicusError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(
                    self.retry_base_delay_ms * 2u64.pow(u32::from(attempt) - 1),
                );
                debug!(%url, attempt, ?delay, "Retrying Copernicus request");
                tokio::time::sleep(delay).await;
            }

            match self
                .build_request(url, credentials)
                .timeout(self.timeout)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_server_error() && attempt < self.max_retries {
                        last_error = Some(CopernicusError::ApiRequestFailed {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                        continue;
                    }
                    return ensure_success(response, url).await;
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        last_error = Some(e.into());
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            CopernicusError::invalid_response("Unknown error during fetch")
        }))
    }
}

/// Pass 2xx responses through and turn everything else into an error.
pub async fn ensure_success(response: Response, url: &Url) -> CopernicusResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(CopernicusError::Unauthorized);
    }
    if status.is_server_error() {
        let body = response.text().await.unwrap_or_default();
        return Err(CopernicusError::Server {
            status: status.as_u16(),
            message: parse_error_message(&body),
        });
    }
    Err(CopernicusError::ApiRequestFailed {
        status: status.as_u16(),
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_takes_retry_settings_from_config() {
        let config = CopernicusConfig::new()
            .with_max_retries(5)
            .with_retry_delay(Duration::from_millis(20));
        let backend = ReqwestBackend::new(&config).unwrap();
        assert_eq!(backend.max_retries, 5);
        assert_eq!(backend.retry_base_delay_ms, 20);
    }
}
