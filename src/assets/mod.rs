//! Concrete assets
//!
//! ## Families
//!
//! - `installconfig/` - user inputs and `install-config.yml`
//! - `tls/` - root CA, intermediate CAs and leaf certificates
//! - `kubeconfig` - admin and kubelet kubeconfigs
//! - `ignition/` - bootstrap node ignition config
//! - `cluster/` - terraform variables and the provisioned cluster
//!
//! `stock` wires all of them into one `AssetGraph`.

pub mod cluster;
pub mod ignition;
pub mod installconfig;
pub mod kubeconfig;
pub mod stock;
pub mod tls;
pub mod user_provided;

pub use stock::{Stock, StockContext};
pub use user_provided::UserProvided;
