//! Grid acquisition handler, shared by `sds fetch-grid` and `fetch-grid`.

use std::path::PathBuf;

use sds_download::{AcquireOutcome, GridRequest, HttpFetcher, TerminalProgress, ensure_grid};

use crate::error::CliError;

/// Fetch the tiling grid unless it is already present.
pub async fn execute(url: Option<String>, dir: Option<PathBuf>) -> Result<AcquireOutcome, CliError> {
    let mut request = GridRequest::from_env()?;
    if let Some(url) = url {
        request = request.with_url(url);
    }
    if let Some(dir) = dir {
        request = request.with_dir(dir);
    }

    let fetcher = HttpFetcher::new().map_err(|e| CliError::Remote(e.to_string()))?;
    let progress = TerminalProgress::new();
    let callback = progress.callback();

    match ensure_grid(&request, &fetcher, Some(&callback)).await {
        Ok(outcome) => {
            match &outcome {
                AcquireOutcome::AlreadyPresent(path) => {
                    progress.abandon();
                    println!("Grid file already available at {}", path.display());
                }
                AcquireOutcome::Downloaded { path, bytes } => {
                    progress.finish("done");
                    println!("Grid file downloaded to {} ({bytes} bytes)", path.display());
                }
            }
            Ok(outcome)
        }
        Err(e) => {
            progress.abandon();
            Err(e.into())
        }
    }
}
