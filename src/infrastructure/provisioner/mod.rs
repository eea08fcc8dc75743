//! Provisioner Implementations
//!
//! - `terraform` - runs the `terraform` CLI as a subprocess

mod terraform;

pub use terraform::{TerraformProvisioner, STATE_FILE_NAME};
