//! Product archive extraction.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::SchedulerError;

fn archive_error(path: &Path, err: impl std::fmt::Display) -> SchedulerError {
    SchedulerError::Archive(format!("{}: {err}", path.display()))
}

/// Unpack `zip_path` into `dest`, keeping the archive's directory layout.
///
/// Entries whose names would escape `dest` are skipped. Returns the number of
/// files written. Blocking; callers on the runtime use `spawn_blocking`.
pub fn extract_archive(zip_path: &Path, dest: &Path) -> Result<usize, SchedulerError> {
    let file = File::open(zip_path).map_err(|e| archive_error(zip_path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| archive_error(zip_path, e))?;

    fs::create_dir_all(dest)?;

    let mut extracted = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| archive_error(zip_path, e))?;

        let Some(relative) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "Skipping archive entry outside the target directory");
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&out_path)?;
        io::copy(&mut entry, &mut out)?;
        extracted += 1;
    }

    debug!(archive = %zip_path.display(), files = extracted, "Extracted archive");
    Ok(extracted)
}
