//! On-disk file snapshot
//!
//! A read-only view of everything that existed under the output directory
//! when the run started. Keys are relative paths using `/` separators.

use std::collections::BTreeMap;

use globset::GlobBuilder;

use crate::domain::entities::{Content, State};
use crate::error::{AssetError, AssetResult};

/// Snapshot of pre-existing output files (relative path → bytes)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnDiskFiles {
    files: BTreeMap<String, Vec<u8>>,
}

impl OnDiskFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), data.into());
    }

    pub fn with_file(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(path, data);
        self
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Load every file matching `pattern` into a State.
    ///
    /// `*` and `?` never match `/`. Contents are sorted lexicographically by
    /// path. Returns `Ok(None)` when nothing matches; a malformed pattern is
    /// an error.
    pub fn load_pattern(&self, pattern: &str) -> AssetResult<Option<State>> {
        let matcher = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| AssetError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?
            .compile_matcher();

        let mut contents: Vec<Content> = self
            .files
            .iter()
            .filter(|(path, _)| matcher.is_match(path.as_str()))
            .map(|(path, data)| Content::new(path.clone(), data.clone()))
            .collect();

        if contents.is_empty() {
            return Ok(None);
        }

        contents.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Some(State::from_contents(contents)))
    }

    /// Load an exact set of paths, in the given order.
    ///
    /// All paths must be present; a partial match is treated as a miss so the
    /// asset regenerates everything together.
    pub fn load_exact(&self, paths: &[&str]) -> Option<State> {
        let contents = paths
            .iter()
            .map(|path| {
                self.files
                    .get(*path)
                    .map(|data| Content::new(path.to_string(), data.clone()))
            })
            .collect::<Option<Vec<_>>>()?;
        Some(State::from_contents(contents))
    }
}

impl FromIterator<(String, Vec<u8>)> for OnDiskFiles {
    fn from_iter<T: IntoIterator<Item = (String, Vec<u8>)>>(iter: T) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}
