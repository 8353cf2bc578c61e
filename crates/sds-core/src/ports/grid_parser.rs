//! Grid parser port definition.
//!
//! The tiling grid is published as KML. This port hides the file format from
//! the grid service; the implementation lives in `sds-kml`.

use std::path::Path;

use thiserror::Error;

use crate::domain::Grid;

/// Errors that can occur while parsing a grid file.
#[derive(Debug, Error)]
pub enum GridParseError {
    /// The file does not exist.
    #[error("Grid file not found: {0}")]
    NotFound(String),

    /// The file is not a valid grid document.
    #[error("Invalid grid format: {0}")]
    InvalidFormat(String),

    /// IO error while reading the file.
    #[error("IO error: {0}")]
    Io(String),
}

/// Port for reading a tiling grid from disk.
pub trait GridParserPort: Send + Sync {
    /// Parse every cell of the grid file at `path`, keeping source order.
    fn parse(&self, path: &Path) -> Result<Grid, GridParseError>;
}
