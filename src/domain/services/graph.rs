//! Asset arena
//!
//! Owns every asset of a run. Handles are handed out in insertion order and
//! never reused, so memoization keyed by `AssetId` is keyed by node identity.

use crate::domain::ports::Asset;
use crate::domain::value_objects::AssetId;
use crate::error::{AssetError, AssetResult};

#[derive(Default)]
pub struct AssetGraph {
    assets: Vec<Box<dyn Asset>>,
}

impl AssetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset and return its handle
    pub fn add(&mut self, asset: impl Asset + 'static) -> AssetId {
        self.add_boxed(Box::new(asset))
    }

    pub fn add_boxed(&mut self, asset: Box<dyn Asset>) -> AssetId {
        let id = AssetId::from_index(self.assets.len());
        self.assets.push(asset);
        id
    }

    /// Handle the next `add` will return
    pub fn next_id(&self) -> AssetId {
        AssetId::from_index(self.assets.len())
    }

    pub fn get(&self, id: AssetId) -> AssetResult<&dyn Asset> {
        self.assets
            .get(id.index())
            .map(|a| a.as_ref())
            .ok_or(AssetError::UnknownAsset(id))
    }

    pub fn name(&self, id: AssetId) -> &str {
        self.assets
            .get(id.index())
            .map(|a| a.name())
            .unwrap_or("<unknown>")
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = AssetId> {
        (0..self.assets.len()).map(AssetId::from_index)
    }
}

impl std::fmt::Debug for AssetGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.assets.iter().map(|a| a.name()))
            .finish()
    }
}
