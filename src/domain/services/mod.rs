//! Domain Services
//!
//! - `AssetGraph` - arena owning every asset of a run
//! - `Resolver` - memoized, depth-first generation driver

mod graph;
mod resolver;

pub use graph::AssetGraph;
pub use resolver::{Origin, ReportEntry, Resolution, ResolveReport, Resolver};
