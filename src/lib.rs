//! Clusterforge - cluster asset compiler
//!
//! Clusterforge turns a handful of user inputs into everything needed to
//! bring up a cluster: install config, PKI, kubeconfigs, bootstrap ignition
//! and infrastructure state. Every artifact is an asset in one dependency
//! graph; assets already present in the output directory are reused instead
//! of regenerated.

pub mod application;
pub mod assets;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{CreateOptions, CreateResult, CreateUseCase};
pub use assets::{Stock, StockContext};
pub use config::Config;
pub use domain::services::{AssetGraph, Origin, ResolveReport, Resolver};
pub use domain::value_objects::{Environment, Target};
pub use error::{AssetError, AssetResult, ForgeError, ForgeResult};
