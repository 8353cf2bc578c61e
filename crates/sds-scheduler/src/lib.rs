//! Copernicus product request scheduling.
//!
//! [`RequestScheduler`] records product requests, downloads products through a
//! [`ProductCatalogPort`](sds_core::ProductCatalogPort), retries products that
//! are not ready yet, and prepares downloaded archives for processing.
//! [`JsonScheduleStore`] persists the schedule as a JSON file.
#![deny(unused_crate_dependencies)]

mod archive;
mod config;
mod error;
mod local;
mod metadata;
mod scheduler;
mod store;

pub use archive::extract_archive;
pub use config::{DEFAULT_RETRY_INTERVAL, SchedulerConfig};
pub use error::SchedulerError;
pub use local::local_state;
pub use metadata::{find_metadata_file, parse_band_resolutions_str, read_band_resolutions};
pub use scheduler::RequestScheduler;
pub use store::JsonScheduleStore;

#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;
