//! Generated asset state
//!
//! A `State` is an ordered list of `Content` entries. The name of a content is
//! its path relative to the output directory; an empty name keeps the data in
//! memory only.

use std::fs;
use std::path::Path;

use crate::error::{AssetError, AssetResult};

/// A generated portion of an asset
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Content {
    /// Path relative to the output directory, or empty for in-memory data
    pub name: String,
    pub data: Vec<u8>,
}

impl Content {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Content that is never written to disk
    pub fn in_memory(data: impl Into<Vec<u8>>) -> Self {
        Self::new(String::new(), data)
    }

    pub fn is_persisted(&self) -> bool {
        !self.name.is_empty()
    }

    /// Last path segment of the name
    pub fn basename(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// The state of an asset: everything one generation produced
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct State {
    contents: Vec<Content>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_contents(contents: Vec<Content>) -> Self {
        Self { contents }
    }

    pub fn with_content(mut self, content: Content) -> Self {
        self.contents.push(content);
        self
    }

    pub fn push(&mut self, content: Content) {
        self.contents.push(content);
    }

    pub fn contents(&self) -> &[Content] {
        &self.contents
    }

    pub fn into_contents(self) -> Vec<Content> {
        self.contents
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// First content whose basename equals `filename`
    pub fn find_by_filename(&self, filename: &str) -> Option<&Content> {
        self.contents.iter().find(|c| c.basename() == filename)
    }

    /// Write every named content below `directory`.
    ///
    /// Parent directories are created and existing files overwritten. The
    /// first failure stops the remaining writes; files already written stay.
    pub fn persist_to_file(&self, directory: &Path) -> AssetResult<()> {
        for content in self.contents.iter().filter(|c| c.is_persisted()) {
            let path = directory.join(&content.name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| AssetError::io(parent, e))?;
            }
            fs::write(&path, &content.data).map_err(|e| AssetError::io(&path, e))?;
        }
        Ok(())
    }
}
