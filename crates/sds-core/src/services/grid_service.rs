//! Grid service - owns the tiling grid and answers location queries.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::{GeoPoint, Grid, GridCell, LocationCells};
use crate::ports::{GridParseError, GridParserPort};

/// Errors surfaced by [`GridService`].
#[derive(Debug, Error)]
pub enum GridError {
    /// The grid file has not been fetched yet.
    #[error("Grid file {} is missing, run `sds fetch-grid` first", path.display())]
    Unavailable { path: PathBuf },

    #[error("Failed to parse grid: {0}")]
    Parse(String),

    #[error("Unknown grid cell: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Service for grid queries.
///
/// The grid is parsed on first use and then shared as `Arc<Grid>`.
pub struct GridService {
    path: PathBuf,
    parser: Arc<dyn GridParserPort>,
    grid: RwLock<Option<Arc<Grid>>>,
}

impl GridService {
    pub fn new(path: impl Into<PathBuf>, parser: Arc<dyn GridParserPort>) -> Self {
        Self {
            path: path.into(),
            parser,
            grid: RwLock::new(None),
        }
    }

    /// Path of the grid file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub(crate) async fn is_loaded(&self) -> bool {
        self.grid.read().await.is_some()
    }

    /// The grid, parsing the file on first use.
    ///
    /// Concurrent first callers wait for a single parse.
    pub async fn grid(&self) -> Result<Arc<Grid>, GridError> {
        if let Some(grid) = self.grid.read().await.as_ref() {
            return Ok(Arc::clone(grid));
        }

        let mut slot = self.grid.write().await;
        if let Some(grid) = slot.as_ref() {
            return Ok(Arc::clone(grid));
        }
        let grid = self.parse().await?;
        *slot = Some(Arc::clone(&grid));
        Ok(grid)
    }

    /// Parse the grid file now, replacing any loaded grid.
    pub async fn load_grid(&self) -> Result<Arc<Grid>, GridError> {
        let mut slot = self.grid.write().await;
        let grid = self.parse().await?;
        *slot = Some(Arc::clone(&grid));
        Ok(grid)
    }

    /// Alias of [`Self::load_grid`] for callers that know a grid is loaded.
    pub async fn reload_grid(&self) -> Result<Arc<Grid>, GridError> {
        self.load_grid().await
    }

    /// Look up a cell by name.
    pub async fn cell(&self, name: &str) -> Result<GridCell, GridError> {
        self.grid()
            .await?
            .cell(name)
            .cloned()
            .ok_or_else(|| GridError::NotFound(name.to_string()))
    }

    /// Cells containing at least one of `points`, in grid order.
    pub async fn select_containing_cells(
        &self,
        points: &[GeoPoint],
    ) -> Result<Vec<GridCell>, GridError> {
        let grid = self.grid().await?;
        let cells: Vec<GridCell> = grid
            .select_containing(points)
            .into_iter()
            .cloned()
            .collect();
        debug!(
            locations = points.len(),
            cells = cells.len(),
            "Selected containing cells"
        );
        Ok(cells)
    }

    /// For each distinct point, the names of the cells containing it.
    pub async fn map_locations_to_cell_names(
        &self,
        points: &[GeoPoint],
    ) -> Result<Vec<LocationCells>, GridError> {
        Ok(self.grid().await?.map_locations(points))
    }

    async fn parse(&self) -> Result<Arc<Grid>, GridError> {
        let parser = Arc::clone(&self.parser);
        let path = self.path.clone();
        let started = std::time::Instant::now();

        let grid = tokio::task::spawn_blocking(move || parser.parse(&path))
            .await
            .map_err(|e| GridError::Internal(format!("Grid parse task failed: {e}")))?
            .map_err(|e| match e {
                GridParseError::NotFound(_) => GridError::Unavailable {
                    path: self.path.clone(),
                },
                other => GridError::Parse(other.to_string()),
            })?;

        info!(
            path = %self.path.display(),
            cells = grid.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Loaded tiling grid"
        );
        Ok(Arc::new(grid))
    }
}
