//! Persistence of the product request schedule.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::ProductRequest;

/// Requests keyed by product id.
pub type Schedule = BTreeMap<String, ProductRequest>;

/// Port for loading and storing the schedule as a whole.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Load the stored schedule. A missing store yields an empty schedule.
    async fn load(&self) -> Result<Schedule, RepositoryError>;

    /// Replace the stored schedule.
    async fn save(&self, schedule: &Schedule) -> Result<(), RepositoryError>;
}
