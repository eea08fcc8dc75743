//! Asset handle value object
//!
//! Assets live in an arena and are addressed by position. Two assets with the
//! same display name are still two different nodes.

use std::fmt;

/// Stable handle to an asset inside an `AssetGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(usize);

impl AssetId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Position of the asset in its graph
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
