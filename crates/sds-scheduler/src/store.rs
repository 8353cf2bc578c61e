//! JSON file implementation of [`ScheduleRepository`].
//!
//! The file holds an array of requests ordered by id. Writes go to a sibling
//! temporary file that is renamed over the schedule.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sds_core::{ProductRequest, RepositoryError, Schedule, ScheduleRepository};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct JsonScheduleStore {
    path: PathBuf,
}

impl JsonScheduleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn storage(err: &std::io::Error, path: &Path) -> RepositoryError {
    RepositoryError::Storage(format!("{}: {err}", path.display()))
}

#[async_trait]
impl ScheduleRepository for JsonScheduleStore {
    async fn load(&self) -> Result<Schedule, RepositoryError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Schedule::new()),
            Err(e) => return Err(storage(&e, &self.path)),
        };
        let requests: Vec<ProductRequest> = serde_json::from_slice(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        debug!(path = %self.path.display(), requests = requests.len(), "Loaded schedule");
        Ok(requests.into_iter().map(|r| (r.id.clone(), r)).collect())
    }

    async fn save(&self, schedule: &Schedule) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage(&e, parent))?;
        }
        let requests: Vec<&ProductRequest> = schedule.values().collect();
        let json = serde_json::to_vec_pretty(&requests)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| storage(&e, &tmp))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| storage(&e, &self.path))
    }
}
