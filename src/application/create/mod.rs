//! Create Use Case
//!
//! Produces every asset a target needs.
//!
//! This module handles:
//! - Holding the run lock on the output directory
//! - Snapshotting what is already on disk
//! - Resolving the target's roots and persisting fresh output

mod options;
mod result;
mod use_case;

pub use options::CreateOptions;
pub use result::CreateResult;
pub use use_case::CreateUseCase;
