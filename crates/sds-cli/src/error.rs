//! CLI-specific error types and mappings.
//!
//! Maps library errors to exit codes and user-facing messages.

use sds_core::{CatalogError, GridError, PathError};
use sds_download::AcquireError;
use sds_scheduler::SchedulerError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Domain error.
    #[error("{0}")]
    Core(String),

    /// Argument error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The Copernicus hub or the grid server failed.
    #[error("Remote service error: {0}")]
    Remote(String),

    /// Requested data is not there (yet).
    #[error("{0}")]
    Unavailable(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Core(_) => 1,
            Self::Arguments(_) => 2,    // EX_USAGE
            Self::Unavailable(_) => 66, // EX_NOINPUT
            Self::Remote(_) => 69,      // EX_UNAVAILABLE
            Self::Io(_) => 74,          // EX_IOERR
            Self::Config(_) => 78,      // EX_CONFIG
        }
    }
}

impl From<GridError> for CliError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::Unavailable { .. } | GridError::NotFound(_) => {
                Self::Unavailable(err.to_string())
            }
            other => Self::Core(other.to_string()),
        }
    }
}

impl From<CatalogError> for CliError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Unauthorized => Self::Config(err.to_string()),
            CatalogError::NotFound(_) => Self::Unavailable(err.to_string()),
            CatalogError::Io(msg) => Self::Io(msg),
            other => Self::Remote(other.to_string()),
        }
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<AcquireError> for CliError {
    fn from(err: AcquireError) -> Self {
        match err {
            AcquireError::Directory(path_err) => Self::Io(path_err.to_string()),
            AcquireError::Inspect { .. } => Self::Io(err.to_string()),
            AcquireError::Fetch { .. } => Self::Remote(err.to_string()),
        }
    }
}

impl From<SchedulerError> for CliError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::UnknownRequest(_)
            | SchedulerError::NotAvailable { .. }
            | SchedulerError::ArchiveMissing(_) => Self::Unavailable(err.to_string()),
            SchedulerError::Catalog(catalog_err) => catalog_err.into(),
            SchedulerError::Path(path_err) => path_err.into(),
            SchedulerError::Io(io_err) => io_err.into(),
            other => Self::Core(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn exit_codes() {
        assert_eq!(CliError::Arguments(String::new()).exit_code(), 2);
        assert_eq!(CliError::Config(String::new()).exit_code(), 78);
    }

    #[test]
    fn missing_grid_points_at_fetch_grid() {
        let err: CliError = GridError::Unavailable {
            path: PathBuf::from("data/grid.kml"),
        }
        .into();
        assert_eq!(err.exit_code(), 66);
        assert!(err.to_string().contains("sds fetch-grid"));
    }

    #[test]
    fn unauthorized_is_a_configuration_error() {
        let err: CliError = SchedulerError::Catalog(CatalogError::Unauthorized).into();
        assert_eq!(err.exit_code(), 78);
    }
}
