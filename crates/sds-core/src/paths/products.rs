//! Locations used by the Copernicus request scheduler.

use std::path::PathBuf;

use super::error::PathError;
use super::root::{data_root, env_path_override};

/// Environment variable overriding the products directory.
pub const PRODUCTS_DIR_ENV: &str = "SDS_PRODUCTS_DIR";

/// Environment variable overriding the schedule file.
pub const SCHEDULE_PATH_ENV: &str = "SDS_SCHEDULE_PATH";

/// Directory where downloaded Sentinel products are stored.
pub fn products_dir() -> Result<PathBuf, PathError> {
    if let Some(path) = env_path_override(PRODUCTS_DIR_ENV)? {
        return Ok(path);
    }
    Ok(data_root()?.join("copernicus"))
}

/// File the request schedule is persisted to.
pub fn schedule_path() -> Result<PathBuf, PathError> {
    if let Some(path) = env_path_override(SCHEDULE_PATH_ENV)? {
        return Ok(path);
    }
    Ok(data_root()?.join("schedule.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::test_utils::{ENV_LOCK, EnvVarGuard};

    #[test]
    fn defaults_follow_data_root() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _root = EnvVarGuard::set("SDS_DATA_DIR", "/volume");
        let _products = EnvVarGuard::unset(PRODUCTS_DIR_ENV);
        let _schedule = EnvVarGuard::unset(SCHEDULE_PATH_ENV);

        assert_eq!(products_dir().unwrap(), PathBuf::from("/volume/copernicus"));
        assert_eq!(
            schedule_path().unwrap(),
            PathBuf::from("/volume/schedule.json")
        );
    }

    #[test]
    fn explicit_overrides_are_independent_of_root() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _root = EnvVarGuard::set("SDS_DATA_DIR", "/volume");
        let _products = EnvVarGuard::set(PRODUCTS_DIR_ENV, "/scratch/products");
        let _schedule = EnvVarGuard::set(SCHEDULE_PATH_ENV, "/state/schedule.json");

        assert_eq!(
            products_dir().unwrap(),
            PathBuf::from("/scratch/products")
        );
        assert_eq!(
            schedule_path().unwrap(),
            PathBuf::from("/state/schedule.json")
        );
    }
}
