//! Create options

use std::path::PathBuf;

use crate::domain::value_objects::Target;

/// Options for the create command
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// What to produce
    pub target: Target,
    /// Directory holding the run's output (and the previous run's)
    pub output_dir: PathBuf,
}

impl CreateOptions {
    /// Options for `target`, writing to the current directory
    pub fn new(target: Target) -> Self {
        Self {
            target,
            output_dir: PathBuf::from("."),
        }
    }

    /// Set output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}
