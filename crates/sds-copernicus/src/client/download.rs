//! Archive download and long-term-archive triggering.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use md5::{Digest, Md5};
use reqwest::{Response, StatusCode};
use sds_core::Credentials;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::CopernicusClient;
use crate::error::{CopernicusError, CopernicusResult};
use crate::http::ensure_success;

impl CopernicusClient {
    /// Download `<title>.zip` into `dir`, or trigger its retrieval when offline.
    pub(crate) async fn fetch_product(
        &self,
        id: &str,
        dir: &Path,
        credentials: &Credentials,
    ) -> CopernicusResult<PathBuf> {
        let metadata = self.fetch_metadata(id, credentials).await?;
        let target = dir.join(format!("{}.zip", metadata.title));

        if tokio::fs::try_exists(&target).await.unwrap_or(false) {
            debug!(path = %target.display(), "Archive already downloaded");
            return Ok(target);
        }

        let url = self.product_url(id, "/$value")?;
        let response = self.backend.get(&url, credentials).await?;
        let status = response.status();

        if status == StatusCode::ACCEPTED {
            info!(id, "Retrieval from the long-term archive was triggered");
            return Err(CopernicusError::LtaTriggered { id: id.to_string() });
        }
        if !metadata.online {
            match status {
                StatusCode::FORBIDDEN => {
                    return Err(CopernicusError::LtaError {
                        id: id.to_string(),
                        message: "User quota exceeded".to_string(),
                    });
                }
                StatusCode::SERVICE_UNAVAILABLE => {
                    return Err(CopernicusError::LtaError {
                        id: id.to_string(),
                        message: "Request not accepted".to_string(),
                    });
                }
                _ => {}
            }
        }
        if status == StatusCode::NOT_FOUND {
            return Err(CopernicusError::ProductNotFound { id: id.to_string() });
        }

        let response = ensure_success(response, &url).await?;
        self.stream_archive(response, &target, metadata.checksum.as_deref())
            .await?;
        info!(id, path = %target.display(), "Product downloaded");
        Ok(target)
    }

    /// Stream into `<target>.incomplete`, verify the MD5, then rename.
    ///
    /// A transfer error leaves the `.incomplete` file in place. A checksum
    /// mismatch removes it.
    #[allow(clippy::unused_self)]
    async fn stream_archive(
        &self,
        response: Response,
        target: &Path,
        checksum: Option<&str>,
    ) -> CopernicusResult<()> {
        let incomplete = incomplete_path(target);
        let mut file = tokio::fs::File::create(&incomplete).await?;
        let mut hasher = Md5::new();
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            hasher.update(&chunk);
            written += chunk.len() as u64;
        }
        file.flush().await?;
        drop(file);

        let actual = format!("{:x}", hasher.finalize());
        if let Some(expected) = checksum {
            if !expected.eq_ignore_ascii_case(&actual) {
                warn!(path = %incomplete.display(), expected, actual = %actual, "Checksum mismatch");
                if let Err(e) = tokio::fs::remove_file(&incomplete).await {
                    warn!(error = %e, "Failed to remove corrupt download");
                }
                return Err(CopernicusError::InvalidChecksum {
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        tokio::fs::rename(&incomplete, target).await?;
        debug!(bytes = written, "Archive verified");
        Ok(())
    }
}

/// `<target>.incomplete`.
pub fn incomplete_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(".incomplete");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_suffix() {
        assert_eq!(
            incomplete_path(Path::new("/d/S2A_X.zip")),
            PathBuf::from("/d/S2A_X.zip.incomplete")
        );
    }
}
