//! HTTP implementation of [`ResourceFetcher`].
//!
//! The body streams into `<dest>.part`, which is renamed onto `dest` once
//! the transfer completed. A failed transfer leaves neither file behind.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use sds_core::{DownloadError, ProgressCallback, ResourceFetcher};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Fetches resources over HTTP(S) with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with the crate's user agent and a connect timeout.
    ///
    /// No overall timeout is set; the grid file is large.
    pub fn new() -> Result<Self, DownloadError> {
        let client = Client::builder()
            .user_agent(concat!("sds-download/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DownloadError::network(format!("Failed to build HTTP client: {e}"), None))?;
        Ok(Self { client })
    }

    /// Use an existing client.
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn stream_to(
        &self,
        url: reqwest::Url,
        part: &Path,
        progress: Option<&ProgressCallback>,
    ) -> Result<u64, DownloadError> {
        let response = self.client.get(url).send().await.map_err(from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::network(
                format!("Server answered {status}"),
                Some(status.as_u16()),
            ));
        }

        let total = response.content_length();
        let mut file = tokio::fs::File::create(part).await?;
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(from_reqwest)?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            if let Some(cb) = progress {
                cb(downloaded, total);
            }
        }
        file.flush().await?;

        if let Some(expected) = total {
            if downloaded != expected {
                return Err(DownloadError::network(
                    format!("Transfer ended after {downloaded} of {expected} bytes"),
                    None,
                ));
            }
        }
        Ok(downloaded)
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<&ProgressCallback>,
    ) -> Result<u64, DownloadError> {
        let parsed =
            reqwest::Url::parse(url).map_err(|e| DownloadError::InvalidUrl(format!("{url}: {e}")))?;
        let part = part_path(dest);

        let result = match self.stream_to(parsed, &part, progress).await {
            Ok(bytes) => tokio::fs::rename(&part, dest)
                .await
                .map(|()| bytes)
                .map_err(DownloadError::from),
            Err(e) => Err(e),
        };

        if result.is_err() {
            if let Err(e) = tokio::fs::remove_file(&part).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %part.display(), error = %e, "Failed to remove partial download");
                }
            }
        } else {
            debug!(path = %dest.display(), "Moved completed download into place");
        }
        result
    }
}

fn from_reqwest(err: reqwest::Error) -> DownloadError {
    DownloadError::network(err.to_string(), err.status().map(|s| s.as_u16()))
}

/// `dest` with `.part` appended to its file name.
pub fn part_path(dest: &Path) -> PathBuf {
    let mut name = OsString::from(dest.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}
