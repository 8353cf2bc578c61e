//! Local availability of product files.

use std::path::Path;

use sds_core::QueryState;
use tracing::debug;

/// Derive a request state from the files in `dir` that start with `title`.
///
/// `.zip` or `.SAFE` means available, `.incomplete` means incomplete;
/// otherwise `stored` is kept.
pub async fn local_state(dir: &Path, title: &str, stored: QueryState) -> QueryState {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "Products directory not readable");
            return stored;
        }
    };

    let mut incomplete = false;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !name.starts_with(title) {
            continue;
        }
        if name.ends_with(".zip") || name.ends_with(".SAFE") {
            return QueryState::Available;
        }
        if name.ends_with(".incomplete") {
            incomplete = true;
        }
    }

    if incomplete { QueryState::Incomplete } else { stored }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLE: &str = "S2A_MSIL1C_20220104T103431_N0301_R108_T32UMA_20220104T123507";

    #[tokio::test]
    async fn archive_or_safe_is_available() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(format!("{TITLE}.zip")), "").unwrap();
        assert_eq!(
            local_state(dir.path(), TITLE, QueryState::New).await,
            QueryState::Available
        );

        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(format!("{TITLE}.SAFE"))).unwrap();
        assert_eq!(
            local_state(dir.path(), TITLE, QueryState::Pending).await,
            QueryState::Available
        );
    }

    #[tokio::test]
    async fn partial_download_is_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(format!("{TITLE}.zip.incomplete")), "").unwrap();
        assert_eq!(
            local_state(dir.path(), TITLE, QueryState::New).await,
            QueryState::Incomplete
        );
    }

    #[tokio::test]
    async fn other_products_do_not_count() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("S2B_OTHER.zip"), "").unwrap();
        assert_eq!(
            local_state(dir.path(), TITLE, QueryState::Pending).await,
            QueryState::Pending
        );
        assert_eq!(
            local_state(&dir.path().join("missing"), TITLE, QueryState::New).await,
            QueryState::New
        );
    }
}
