//! Scheduler configuration.

use std::path::PathBuf;
use std::time::Duration;

use sds_core::PathError;
use sds_core::paths::{products_dir, schedule_path};

/// Interval between download attempts for products that are not available yet.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Where archives and extracted products live.
    pub products_dir: PathBuf,
    /// JSON file holding the request schedule.
    pub schedule_path: PathBuf,
    pub retry_interval: Duration,
}

impl SchedulerConfig {
    pub fn new(products_dir: impl Into<PathBuf>, schedule_path: impl Into<PathBuf>) -> Self {
        Self {
            products_dir: products_dir.into(),
            schedule_path: schedule_path.into(),
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }

    /// Paths from `SDS_PRODUCTS_DIR` / `SDS_SCHEDULE_PATH` or the data root.
    pub fn from_env() -> Result<Self, PathError> {
        Ok(Self::new(products_dir()?, schedule_path()?))
    }

    #[must_use]
    pub const fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }
}
