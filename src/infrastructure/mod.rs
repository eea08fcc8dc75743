//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - output directory snapshot and run lock
//! - `provisioner/` - Terraform-backed `Provisioner`

pub mod fs;
pub mod provisioner;

// Re-export for convenience
pub use fs::{load_on_disk_files, RunLock, LOCK_FILE_NAME};
pub use provisioner::TerraformProvisioner;
