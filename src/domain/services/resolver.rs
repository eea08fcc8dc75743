//! Dependency resolver
//!
//! Walks the asset graph depth-first and produces every reachable state
//! exactly once. Per node:
//!
//! 1. memoized → return it (diamonds resolve once)
//! 2. mark in flight, resolve declared dependencies in order
//! 3. `Asset::load` against the on-disk snapshot; a hit is never re-persisted
//! 4. otherwise `Asset::generate`, then persist the fresh state
//! 5. memoize the outcome, success or failure
//!
//! The first error aborts the walk. Re-entering an in-flight node is a cycle.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::entities::State;
use crate::domain::ports::{Asset, Generated, Parents};
use crate::domain::services::AssetGraph;
use crate::domain::value_objects::{AssetId, OnDiskFiles};
use crate::error::{AssetError, AssetResult};

/// Where a resolved state came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Produced by `Asset::generate` during this run
    Generated,
    /// Short-circuited from the on-disk snapshot
    OnDisk,
    /// The asset reported it had nothing to do
    Skipped,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Origin::Generated => "generated",
            Origin::OnDisk => "on disk",
            Origin::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Final outcome for one node
#[derive(Debug, Clone)]
pub struct Resolution {
    pub state: Option<Arc<State>>,
    pub origin: Origin,
}

enum Slot {
    InFlight,
    Done(Resolution),
    Failed(String),
}

/// One line of a `ResolveReport`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub id: AssetId,
    pub name: String,
    pub origin: Origin,
}

/// Every node finalized by a resolver, in the order they completed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub entries: Vec<ReportEntry>,
}

impl ResolveReport {
    pub fn count(&self, origin: Origin) -> usize {
        self.entries.iter().filter(|e| e.origin == origin).count()
    }

    pub fn origin_of(&self, name: &str) -> Option<Origin> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.origin)
    }
}

/// Memoized generation driver for one run
pub struct Resolver<'a> {
    graph: &'a AssetGraph,
    on_disk: &'a OnDiskFiles,
    persist_dir: Option<PathBuf>,
    memo: HashMap<AssetId, Slot>,
    finished: Vec<AssetId>,
}

impl<'a> Resolver<'a> {
    /// Resolver that keeps everything in memory
    pub fn new(graph: &'a AssetGraph, on_disk: &'a OnDiskFiles) -> Self {
        Self {
            graph,
            on_disk,
            persist_dir: None,
            memo: HashMap::new(),
            finished: Vec::new(),
        }
    }

    /// Persist freshly generated states below `dir`
    pub fn persist_to(mut self, dir: impl Into<PathBuf>) -> Self {
        self.persist_dir = Some(dir.into());
        self
    }

    pub fn persist_dir(&self) -> Option<&Path> {
        self.persist_dir.as_deref()
    }

    /// Resolve `root` and everything it depends on
    pub fn resolve(&mut self, root: AssetId) -> AssetResult<Resolution> {
        self.resolve_node(root)
    }

    /// Resolution of a node finalized earlier in this run
    pub fn resolution(&self, id: AssetId) -> Option<&Resolution> {
        match self.memo.get(&id) {
            Some(Slot::Done(resolution)) => Some(resolution),
            _ => None,
        }
    }

    pub fn state(&self, id: AssetId) -> Option<Arc<State>> {
        self.resolution(id).and_then(|r| r.state.clone())
    }

    pub fn report(&self) -> ResolveReport {
        ResolveReport {
            entries: self
                .finished
                .iter()
                .filter_map(|id| {
                    self.resolution(*id).map(|r| ReportEntry {
                        id: *id,
                        name: self.graph.name(*id).to_string(),
                        origin: r.origin,
                    })
                })
                .collect(),
        }
    }

    fn resolve_node(&mut self, id: AssetId) -> AssetResult<Resolution> {
        let graph = self.graph;
        let asset = graph.get(id)?;

        match self.memo.get(&id) {
            Some(Slot::Done(resolution)) => {
                tracing::trace!(asset = asset.name(), "memoized");
                return Ok(resolution.clone());
            }
            Some(Slot::InFlight) => {
                return Err(AssetError::Cycle {
                    asset: asset.name().to_string(),
                })
            }
            Some(Slot::Failed(cause)) => {
                return Err(AssetError::PreviouslyFailed {
                    asset: asset.name().to_string(),
                    cause: cause.clone(),
                })
            }
            None => {}
        }

        self.memo.insert(id, Slot::InFlight);
        match self.build(asset) {
            Ok(resolution) => {
                self.memo.insert(id, Slot::Done(resolution.clone()));
                self.finished.push(id);
                Ok(resolution)
            }
            Err(err) => {
                self.memo.insert(id, Slot::Failed(err.chain()));
                Err(err)
            }
        }
    }

    fn build(&mut self, asset: &dyn Asset) -> AssetResult<Resolution> {
        let name = asset.name();
        tracing::debug!(asset = name, "resolving");

        let mut parents = Parents::new();
        for dep in asset.dependencies() {
            let resolved = self
                .resolve_node(dep)
                .map_err(|source| AssetError::Dependency {
                    asset: name.to_string(),
                    source: Box::new(source),
                })?;
            parents.insert(dep, self.graph.name(dep), resolved.state);
        }

        let wrap = |source: AssetError| AssetError::Generate {
            asset: name.to_string(),
            source: Box::new(source),
        };

        if let Some(state) = asset.load(self.on_disk).map_err(wrap)? {
            tracing::info!(asset = name, "loaded from disk");
            return Ok(Resolution {
                state: Some(Arc::new(state)),
                origin: Origin::OnDisk,
            });
        }

        match asset.generate(&parents, self.on_disk) {
            Ok(Generated::State(state)) => {
                self.persist(name, &state)?;
                tracing::info!(asset = name, "generated");
                Ok(Resolution {
                    state: Some(Arc::new(state)),
                    origin: Origin::Generated,
                })
            }
            Ok(Generated::Skipped) => {
                tracing::info!(asset = name, "skipped");
                Ok(Resolution {
                    state: None,
                    origin: Origin::Skipped,
                })
            }
            Err(AssetError::Salvaged { state, source }) => {
                tracing::warn!(asset = name, "generation failed, keeping partial output");
                if let Err(persist_err) = self.persist(name, &state) {
                    tracing::error!(asset = name, error = %persist_err, "failed to persist partial output");
                }
                Err(wrap(*source))
            }
            Err(err) => Err(wrap(err)),
        }
    }

    fn persist(&self, name: &str, state: &State) -> AssetResult<()> {
        let Some(dir) = &self.persist_dir else {
            return Ok(());
        };
        state
            .persist_to_file(dir)
            .map_err(|source| AssetError::Persist {
                asset: name.to_string(),
                source: Box::new(source),
            })
    }
}
