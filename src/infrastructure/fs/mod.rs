//! File System Implementations
//!
//! Reading the output directory into an `OnDiskFiles` snapshot and guarding
//! it against concurrent runs.

mod local;
mod lock;

pub use local::load_on_disk_files;
pub use lock::{RunLock, LOCK_FILE_NAME};
