//! Domain Layer
//!
//! The asset dependency-graph engine, independent of any concrete asset.
//!
//! ## Structure
//!
//! - `entities/` - `Content` and `State`, the unit of generated output
//! - `value_objects/` - `AssetId`, `OnDiskFiles`, `Environment`
//! - `ports/` - the `Asset` contract and the `Provisioner` boundary
//! - `services/` - `AssetGraph` arena and the memoizing `Resolver`
//!
//! ## Design Principles
//!
//! 1. **Handles, not copies** - assets live in one arena and are addressed by `AssetId`
//! 2. **Snapshot in, states out** - generation sees the on-disk snapshot read-only
//! 3. **Ports & Adapters** - subprocesses go through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
