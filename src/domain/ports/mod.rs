//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Concrete assets and the infrastructure layer provide implementations.

pub mod asset;
pub mod provisioner;

pub use asset::{Asset, Generated, Parents};
pub use provisioner::{ApplyOutcome, ProvisionError, Provisioner, TemplateSet};
