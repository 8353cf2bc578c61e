//! The grid acquisition routine.
//!
//! Check existence, ensure the directory, fetch. Re-running after a
//! successful fetch is a no-op.

use std::path::PathBuf;

use sds_core::paths::{DirectoryCreationStrategy, ensure_directory};
use sds_core::{DownloadError, PathError, ProgressCallback, ResourceFetcher};
use thiserror::Error;
use tracing::{debug, info};

use crate::request::GridRequest;

/// What the routine did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The file was already there; nothing was touched.
    AlreadyPresent(PathBuf),
    /// The file was fetched.
    Downloaded { path: PathBuf, bytes: u64 },
}

impl AcquireOutcome {
    pub const fn path(&self) -> &PathBuf {
        match self {
            Self::AlreadyPresent(path) | Self::Downloaded { path, .. } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error(transparent)]
    Directory(#[from] PathError),

    #[error("Cannot check whether {path} exists: {source}")]
    Inspect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: DownloadError,
    },
}

/// Make sure the grid file exists locally, fetching it when it does not.
pub async fn ensure_grid(
    request: &GridRequest,
    fetcher: &dyn ResourceFetcher,
    progress: Option<&ProgressCallback>,
) -> Result<AcquireOutcome, AcquireError> {
    let target = request.target_path();

    let exists = tokio::fs::try_exists(&target)
        .await
        .map_err(|source| AcquireError::Inspect {
            path: target.clone(),
            source,
        })?;
    if exists {
        info!(path = %target.display(), "Grid file already available");
        return Ok(AcquireOutcome::AlreadyPresent(target));
    }

    if ensure_directory(&request.dir, DirectoryCreationStrategy::AutoCreate)? {
        debug!(dir = %request.dir.display(), "Created grid directory");
    }

    info!(url = %request.url, path = %target.display(), "Downloading grid file");
    let bytes = fetcher
        .fetch(&request.url, &target, progress)
        .await
        .map_err(|source| AcquireError::Fetch {
            url: request.url.clone(),
            source,
        })?;
    info!(path = %target.display(), bytes, "Grid file downloaded");

    Ok(AcquireOutcome::Downloaded {
        path: target,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BODY: &[u8] = b"<kml></kml>";

    /// Writes a fixed body, or fails, and counts calls.
    struct MockFetcher {
        calls: AtomicUsize,
        fail: bool,
    }

    impl MockFetcher {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ResourceFetcher for MockFetcher {
        async fn fetch(
            &self,
            _url: &str,
            dest: &Path,
            progress: Option<&ProgressCallback>,
        ) -> Result<u64, DownloadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DownloadError::network("connection reset", None));
            }
            std::fs::write(dest, BODY)?;
            if let Some(cb) = progress {
                cb(BODY.len() as u64, Some(BODY.len() as u64));
            }
            Ok(BODY.len() as u64)
        }
    }

    fn request_in(dir: &Path) -> GridRequest {
        GridRequest::new(dir.join("data"), "grid.kml", "https://example.org/grid.kml")
    }

    #[tokio::test]
    async fn creates_directory_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let request = request_in(tmp.path());
        let fetcher = MockFetcher::ok();

        let outcome = ensure_grid(&request, &fetcher, None).await.unwrap();

        assert_eq!(
            outcome,
            AcquireOutcome::Downloaded {
                path: request.target_path(),
                bytes: BODY.len() as u64
            }
        );
        assert!(request.dir.is_dir());
        assert_eq!(std::fs::read(request.target_path()).unwrap(), BODY);
    }

    #[tokio::test]
    async fn existing_directory_only_gets_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let request = request_in(tmp.path());
        std::fs::create_dir_all(&request.dir).unwrap();
        std::fs::write(request.dir.join("other.txt"), "keep").unwrap();
        let fetcher = MockFetcher::ok();

        ensure_grid(&request, &fetcher, None).await.unwrap();

        let mut entries: Vec<_> = std::fs::read_dir(&request.dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        entries.sort();
        assert_eq!(entries, vec!["grid.kml", "other.txt"]);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn present_file_is_left_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let request = request_in(tmp.path());
        std::fs::create_dir_all(&request.dir).unwrap();
        std::fs::write(request.target_path(), "old").unwrap();
        let fetcher = MockFetcher::ok();

        let outcome = ensure_grid(&request, &fetcher, None).await.unwrap();

        assert_eq!(outcome, AcquireOutcome::AlreadyPresent(request.target_path()));
        assert_eq!(fetcher.calls(), 0);
        assert_eq!(std::fs::read_to_string(request.target_path()).unwrap(), "old");
    }

    #[tokio::test]
    async fn unreadable_target_is_not_fetched_over() {
        let tmp = tempfile::tempdir().unwrap();
        let not_a_dir = tmp.path().join("data");
        std::fs::write(&not_a_dir, "plain file").unwrap();
        let request = GridRequest::new(&not_a_dir, "grid.kml", "https://example.org/grid.kml");
        let fetcher = MockFetcher::ok();

        let err = ensure_grid(&request, &fetcher, None).await.unwrap_err();

        assert!(matches!(err, AcquireError::Inspect { .. }));
        assert_eq!(fetcher.calls(), 0);
        assert_eq!(std::fs::read_to_string(&not_a_dir).unwrap(), "plain file");
    }

    #[tokio::test]
    async fn second_run_does_not_refetch() {
        let tmp = tempfile::tempdir().unwrap();
        let request = request_in(tmp.path());
        let fetcher = MockFetcher::ok();

        ensure_grid(&request, &fetcher, None).await.unwrap();
        let second = ensure_grid(&request, &fetcher, None).await.unwrap();

        assert!(matches!(second, AcquireOutcome::AlreadyPresent(_)));
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn fetch_failure_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let request = request_in(tmp.path());

        let err = ensure_grid(&request, &MockFetcher::failing(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AcquireError::Fetch { .. }));
        assert!(!request.target_path().exists());
    }

    #[tokio::test]
    async fn progress_reaches_caller() {
        let tmp = tempfile::tempdir().unwrap();
        let request = request_in(tmp.path());
        let seen = std::sync::Arc::new(AtomicUsize::new(0));
        let seen_cb = std::sync::Arc::clone(&seen);
        let progress: ProgressCallback = Box::new(move |done, _total| {
            seen_cb.store(usize::try_from(done).unwrap(), Ordering::SeqCst);
        });

        ensure_grid(&request, &MockFetcher::ok(), Some(&progress))
            .await
            .unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), BODY.len());
    }
}
