//! Machine bootstrap configuration
//!
//! Gathers the install config, PKI material and kubeconfigs into a single
//! Ignition document for the bootstrap node.

mod bootstrap;
pub mod config;
pub mod content;
mod template;

pub use bootstrap::{Bootstrap, BootstrapDeps, BOOTSTRAP_IGN};
pub use template::{render, TemplateData};
