//! Provisioner port - the external infrastructure tool
//!
//! The tool itself is a black box: it gets a working directory and a set of
//! rendered templates, blocks until done, and hands back a state blob.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Provisioner failures
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The tool could not be started at all
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and exited non-zero
    #[error("{program} {step} exited with {status}: {stderr}")]
    Exit {
        program: String,
        step: String,
        status: String,
        stderr: String,
    },

    /// Working directory preparation failed
    #[error("failed to prepare working directory {path}: {source}")]
    Workdir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tool reported success but left no state behind
    #[error("no state file found at {path}")]
    MissingState { path: PathBuf },
}

/// Rendered files to place in the provisioner's working directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSet {
    files: Vec<(String, Vec<u8>)>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.files.push((path.into(), data.into()));
    }

    pub fn with_file(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(path, data);
        self
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files.iter().map(|(p, d)| (p.as_str(), d.as_slice()))
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, d)| d.as_slice())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Write every file below `dir`, creating parent directories.
    pub fn write_to(&self, dir: &Path) -> Result<(), ProvisionError> {
        for (rel, data) in &self.files {
            let path = dir.join(rel);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|source| ProvisionError::Workdir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            std::fs::write(&path, data)
                .map_err(|source| ProvisionError::Workdir { path, source })?;
        }
        Ok(())
    }
}

/// Result of one provisioner run
#[derive(Debug)]
pub enum ApplyOutcome {
    /// Success with the final state blob
    Applied(Vec<u8>),
    /// Failure, but a partial state blob was recovered
    Salvaged {
        state: Vec<u8>,
        error: ProvisionError,
    },
    /// Failure with nothing to recover
    Failed(ProvisionError),
}

impl ApplyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ApplyOutcome::Applied(_))
    }

    /// Whatever state blob the run left behind
    pub fn state(&self) -> Option<&[u8]> {
        match self {
            ApplyOutcome::Applied(state) | ApplyOutcome::Salvaged { state, .. } => {
                Some(state.as_slice())
            }
            ApplyOutcome::Failed(_) => None,
        }
    }
}

/// Runs the infrastructure tool
pub trait Provisioner {
    /// Place `templates` in `workdir`, run the tool there and block until it
    /// finishes.
    fn apply(&self, workdir: &Path, templates: &TemplateSet) -> ApplyOutcome;
}
