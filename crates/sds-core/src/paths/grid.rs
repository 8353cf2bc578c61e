//! Location of the Sentinel-2 tiling grid.

use std::env;
use std::path::PathBuf;

use super::error::PathError;
use super::root::data_root;

/// File name of the tiling grid inside the data root.
pub const GRID_FILE_NAME: &str = "sentinel_2_level_1c_tiling_grid.kml";

/// ESA publication of the Sentinel-2 Level-1C tiling grid.
pub const DEFAULT_GRID_URL: &str = "https://sentinel.esa.int/documents/247904/1955685/S2A_OPER_GIP_TILPAR_MPC__20151209T095117_V20150622T000000_21000101T000000_B00.kml";

/// Environment variable overriding the grid download URL.
pub const GRID_URL_ENV: &str = "SDS_GRID_URL";

/// Directory the grid is stored in.
pub fn grid_dir() -> Result<PathBuf, PathError> {
    data_root()
}

/// Full path of the local grid file.
pub fn grid_file_path() -> Result<PathBuf, PathError> {
    Ok(grid_dir()?.join(GRID_FILE_NAME))
}

/// URL the grid is fetched from.
pub fn grid_url() -> String {
    env::var(GRID_URL_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_GRID_URL.to_string())
}
