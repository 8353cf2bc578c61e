//! Remote resource fetching.
//!
//! Used by the grid acquisition routine. Implementations write the body of
//! `url` to `dest`; callers decide whether `dest` may be written at all.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Progress callback: `(bytes_downloaded, total_bytes_if_known)`.
pub type ProgressCallback = Box<dyn Fn(u64, Option<u64>) + Send + Sync>;

/// Error type for fetch operations.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum DownloadError {
    /// I/O error during file operations.
    #[error("I/O error ({kind}): {message}")]
    Io {
        /// The kind of I/O error (e.g., "not found", "permission denied").
        kind: String,
        message: String,
    },

    /// Network/HTTP error during the transfer.
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },

    /// The URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl DownloadError {
    /// Capture a `std::io::Error` as kind and message strings.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        Self::Io {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }

    pub fn network(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
        }
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io_error(&err)
    }
}

/// Port for fetching a remote resource into a local file.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetch `url` into `dest` and return the number of bytes written.
    ///
    /// On error `dest` must not exist afterwards.
    async fn fetch(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<&ProgressCallback>,
    ) -> Result<u64, DownloadError>;
}
