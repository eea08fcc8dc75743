//! Local output directory snapshot
//!
//! Reads every file below the output directory once, at the start of a run.

use std::path::Path;

use walkdir::WalkDir;

use crate::domain::value_objects::OnDiskFiles;
use crate::error::{AssetError, AssetResult};

use super::lock::LOCK_FILE_NAME;

/// Snapshot every regular file below `dir`.
///
/// Keys are paths relative to `dir` joined with `/`. Directories are skipped,
/// symlinks are followed to their target's content and the run lock file is
/// ignored. A missing `dir` yields an empty snapshot.
pub fn load_on_disk_files(dir: &Path) -> AssetResult<OnDiskFiles> {
    let mut files = OnDiskFiles::new();
    if !dir.exists() {
        return Ok(files);
    }

    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
            AssetError::io(path, source)
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(dir)
            .map_err(|_| AssetError::Config(format!(
                "{} is not below {}",
                entry.path().display(),
                dir.display()
            )))?;
        let key = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if key == LOCK_FILE_NAME {
            continue;
        }

        let data = std::fs::read(entry.path()).map_err(|e| AssetError::io(entry.path(), e))?;
        files.insert(key, data);
    }

    tracing::debug!(dir = %dir.display(), files = files.len(), "loaded on-disk snapshot");
    Ok(files)
}
