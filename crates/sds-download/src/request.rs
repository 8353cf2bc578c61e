//! Where the grid comes from and where it goes.

use std::path::PathBuf;

use sds_core::PathError;
use sds_core::paths::{GRID_FILE_NAME, grid_dir, grid_url};

/// Target directory, file name and source URL of the grid file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRequest {
    pub dir: PathBuf,
    pub file_name: String,
    pub url: String,
}

impl GridRequest {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
            url: url.into(),
        }
    }

    /// Defaults, with `SDS_DATA_DIR` and `SDS_GRID_URL` applied.
    pub fn from_env() -> Result<Self, PathError> {
        Ok(Self::new(grid_dir()?, GRID_FILE_NAME, grid_url()))
    }

    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// `dir/file_name`.
    pub fn target_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_joins_dir_and_name() {
        let request = GridRequest::new("/srv/data", "grid.kml", "https://example.org/grid.kml");
        assert_eq!(request.target_path(), PathBuf::from("/srv/data/grid.kml"));
    }

    #[test]
    fn builders_replace_fields() {
        let request = GridRequest::new("a", "grid.kml", "u1")
            .with_dir("b")
            .with_url("u2");
        assert_eq!(request.dir, PathBuf::from("b"));
        assert_eq!(request.url, "u2");
    }
}
