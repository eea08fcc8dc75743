//! Output directory run lock
//!
//! One run at a time per output directory. The lock is an exclusive advisory
//! lock on a dot-file inside the directory, released on drop.

use std::fs;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{ForgeError, ForgeResult};

/// Name of the lock file inside the output directory
pub const LOCK_FILE_NAME: &str = ".clusterforge.lock";

#[derive(Debug)]
pub struct RunLock {
    file: fs::File,
    path: PathBuf,
}

impl RunLock {
    /// Take the lock without waiting; fails if another run holds it.
    pub fn acquire(dir: &Path) -> ForgeResult<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(LOCK_FILE_NAME);
        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;

        file.try_lock_exclusive().map_err(|_| ForgeError::Locked {
            dir: dir.to_path_buf(),
        })?;

        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
