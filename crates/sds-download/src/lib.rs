//! Grid acquisition for the satellite data service.
//!
//! [`ensure_grid`] makes sure the Sentinel-2 tiling grid exists under the data
//! root, fetching it through a [`ResourceFetcher`] when it does not.
//! [`HttpFetcher`] is the production fetcher.
#![deny(unused_crate_dependencies)]

mod acquire;
mod http;
mod progress;
mod request;

pub use acquire::{AcquireError, AcquireOutcome, ensure_grid};
pub use http::{HttpFetcher, part_path};
pub use progress::TerminalProgress;
pub use request::GridRequest;

// Re-export the port for convenience
pub use sds_core::{DownloadError, ProgressCallback, ResourceFetcher};

#[cfg(test)]
use axum as _;
#[cfg(test)]
use tokio_test as _;
