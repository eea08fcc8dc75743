//! Asset port - the contract every generated artifact implements

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::State;
use crate::domain::value_objects::{AssetId, OnDiskFiles};
use crate::error::{AssetError, AssetResult};

/// Outcome of a successful `Asset::generate` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generated {
    /// Fresh output; the resolver persists it
    State(State),
    /// Nothing to do, typically because a consumer's output already exists
    Skipped,
}

/// A node in the generation graph.
///
/// `dependencies` must return the same handles on every call. `generate` may
/// only read the states of the dependencies it declared.
pub trait Asset {
    /// Human-readable name, used for diagnostics only
    fn name(&self) -> &str;

    /// Assets this one directly depends on, in visitation order
    fn dependencies(&self) -> Vec<AssetId>;

    /// Produce this asset from its dependencies' states and the snapshot
    fn generate(&self, parents: &Parents, on_disk: &OnDiskFiles) -> AssetResult<Generated>;

    /// Look for this asset's own output in the snapshot.
    ///
    /// A hit means `generate` is never called and the state is not persisted
    /// again.
    fn load(&self, _on_disk: &OnDiskFiles) -> AssetResult<Option<State>> {
        Ok(None)
    }
}

#[derive(Debug, Clone)]
struct Parent {
    name: String,
    state: Option<Arc<State>>,
}

/// States of an asset's declared dependencies, keyed by handle
#[derive(Debug, Clone, Default)]
pub struct Parents {
    entries: HashMap<AssetId, Parent>,
}

impl Parents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a dependency. `state` is `None` when the dependency was skipped.
    pub fn insert(&mut self, id: AssetId, name: impl Into<String>, state: Option<Arc<State>>) {
        self.entries.insert(
            id,
            Parent {
                name: name.into(),
                state,
            },
        );
    }

    pub fn with_state(mut self, id: AssetId, name: impl Into<String>, state: State) -> Self {
        self.insert(id, name, Some(Arc::new(state)));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: AssetId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Shared handle to a dependency's state
    pub fn shared(&self, id: AssetId) -> Option<Arc<State>> {
        self.entries.get(&id).and_then(|p| p.state.clone())
    }

    /// State of a dependency, failing if it is absent or was skipped
    pub fn state(&self, id: AssetId) -> AssetResult<&State> {
        match self.entries.get(&id) {
            Some(Parent {
                state: Some(state), ..
            }) => Ok(state.as_ref()),
            Some(Parent { name, state: None }) => Err(AssetError::MissingState {
                asset: name.clone(),
            }),
            None => Err(AssetError::MissingState {
                asset: id.to_string(),
            }),
        }
    }

    /// Data of the content whose basename is `filename` in a dependency's state
    pub fn data_by_filename(&self, id: AssetId, filename: &str) -> AssetResult<&[u8]> {
        let state = self.state(id)?;
        state
            .find_by_filename(filename)
            .map(|c| c.data.as_slice())
            .ok_or_else(|| AssetError::MissingContent {
                asset: self.name_of(id),
                filename: filename.to_string(),
            })
    }

    /// Data of the first content of a dependency (single-value assets)
    pub fn first_data(&self, id: AssetId) -> AssetResult<&[u8]> {
        let state = self.state(id)?;
        state
            .contents()
            .first()
            .map(|c| c.data.as_slice())
            .ok_or_else(|| AssetError::MissingContent {
                asset: self.name_of(id),
                filename: String::new(),
            })
    }

    /// First content of a dependency as UTF-8 text
    pub fn first_text(&self, id: AssetId) -> AssetResult<String> {
        let data = self.first_data(id)?;
        String::from_utf8(data.to_vec()).map_err(|_| AssetError::InvalidInput {
            asset: self.name_of(id),
            message: "value is not valid UTF-8".to_string(),
        })
    }

    fn name_of(&self, id: AssetId) -> String {
        self.entries
            .get(&id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}
