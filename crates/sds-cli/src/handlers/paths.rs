//! Paths command handler.
//!
//! Displays all resolved paths for diagnostics.

use sds_core::paths::ResolvedPaths;

use crate::error::CliError;

/// Print every resolved location in `key = value` format.
pub fn execute() -> Result<(), CliError> {
    let paths = ResolvedPaths::resolve()?;
    println!("{paths}");
    Ok(())
}
