//! Data root resolution.
//!
//! Everything the service persists (grid, products, schedule) lives below one
//! data root. Inside a container this is the mounted volume.

use std::env;
use std::path::PathBuf;

use super::error::PathError;

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "SDS_DATA_DIR";

/// Data root used when no override is set, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Read a path override from the environment.
///
/// Unset means "no override"; set-but-blank is an error so that a typo in a
/// compose file does not silently fall back to the default.
pub(crate) fn env_path_override(key: &'static str) -> Result<Option<PathBuf>, PathError> {
    match env::var(key) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(PathError::EmptyOverride(key));
            }
            Ok(Some(absolutize(PathBuf::from(trimmed))?))
        }
        Err(_) => Ok(None),
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf, PathError> {
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(current_dir()?.join(path))
}

fn current_dir() -> Result<PathBuf, PathError> {
    env::current_dir().map_err(|e| PathError::CurrentDirError(e.to_string()))
}

/// Root directory for all service data.
///
/// `SDS_DATA_DIR` if set, otherwise `./data`.
pub fn data_root() -> Result<PathBuf, PathError> {
    if let Some(path) = env_path_override(DATA_DIR_ENV)? {
        return Ok(path);
    }
    Ok(current_dir()?.join(DEFAULT_DATA_DIR))
}
