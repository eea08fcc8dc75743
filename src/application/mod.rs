//! Application Layer
//!
//! Use cases that orchestrate a run.
//! This layer:
//! - Depends on the domain layer (graph, resolver, ports) and the asset stock
//! - Does NOT decide what an asset contains (that lives in `assets`)
//! - Wires infrastructure (lock, snapshot, provisioner) into the resolver
//!
//! ## Use Cases
//!
//! - `CreateUseCase` - Lock the output directory, snapshot it, resolve one target

pub mod create;

pub use create::{CreateOptions, CreateResult, CreateUseCase};
