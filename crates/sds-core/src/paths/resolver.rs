//! Pure path resolver for testing and CLI introspection.
//!
//! Captures every resolved location in one struct so that the CLI, the HTTP
//! service and the scheduler can be shown to agree (`sds paths`).

use std::path::PathBuf;

use super::{PathError, data_root, grid_file_path, grid_url, products_dir, schedule_path};

/// All resolved paths captured in a single struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Root directory for service data
    pub data_root: PathBuf,
    /// Local tiling grid file
    pub grid_file: PathBuf,
    /// Where the grid is downloaded from
    pub grid_url: String,
    /// Downloaded Sentinel products
    pub products_dir: PathBuf,
    /// Persisted request schedule
    pub schedule_path: PathBuf,
}

impl ResolvedPaths {
    /// Resolve all paths using the current environment.
    pub fn resolve() -> Result<Self, PathError> {
        Ok(Self {
            data_root: data_root()?,
            grid_file: grid_file_path()?,
            grid_url: grid_url(),
            products_dir: products_dir()?,
            schedule_path: schedule_path()?,
        })
    }
}

impl std::fmt::Display for ResolvedPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "data_root = {}", self.data_root.display())?;
        writeln!(f, "grid_file = {}", self.grid_file.display())?;
        writeln!(f, "grid_url = {}", self.grid_url)?;
        writeln!(f, "products_dir = {}", self.products_dir.display())?;
        write!(f, "schedule_path = {}", self.schedule_path.display())
    }
}
