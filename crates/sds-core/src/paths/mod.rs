//! Path utilities for the service's data directories.
//!
//! This module provides the canonical path resolution for all components:
//! - Data root (the container volume)
//! - Tiling grid file and its download URL
//! - Products directory and schedule file
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O - adapters report to the user themselves
//! - Every location can be overridden through an `SDS_*` environment variable

mod ensure;
mod error;
mod grid;
mod products;
mod resolver;
mod root;

#[cfg(test)]
mod test_utils;

// Error type
pub use error::PathError;

// Data root
pub use root::{DATA_DIR_ENV, DEFAULT_DATA_DIR, data_root};

// Grid
pub use grid::{DEFAULT_GRID_URL, GRID_FILE_NAME, GRID_URL_ENV, grid_dir, grid_file_path, grid_url};

// Scheduler storage
pub use products::{PRODUCTS_DIR_ENV, SCHEDULE_PATH_ENV, products_dir, schedule_path};

// Directory operations
pub use ensure::{DirectoryCreationStrategy, ensure_directory, verify_writable};

// Pure resolver for testing and CLI
pub use resolver::ResolvedPaths;
