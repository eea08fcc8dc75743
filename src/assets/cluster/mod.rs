//! Infrastructure family
//!
//! Terraform variables derived from the install config, and the cluster
//! itself, created by running the provisioner.

mod launch;
mod tfvars;

use std::path::PathBuf;
use std::sync::Arc;

pub use launch::{Cluster, TFSTATE};
pub use tfvars::{TerraformVariables, TfvarsAsset, TFVARS};

use crate::domain::ports::Provisioner;
use crate::domain::services::AssetGraph;
use crate::domain::value_objects::AssetId;

/// Handles of the infrastructure assets
#[derive(Debug, Clone, Copy)]
pub struct ClusterStock {
    pub tfvars: AssetId,
    pub cluster: AssetId,
}

impl ClusterStock {
    pub fn establish(
        graph: &mut AssetGraph,
        install_config: AssetId,
        bootstrap: AssetId,
        admin_kubeconfig: AssetId,
        provisioner: Arc<dyn Provisioner>,
        templates_dir: Option<PathBuf>,
    ) -> Self {
        let tfvars = graph.add(TfvarsAsset::new(install_config, bootstrap));
        let cluster = graph.add(Cluster::new(
            tfvars,
            admin_kubeconfig,
            provisioner,
            templates_dir,
        ));
        Self { tfvars, cluster }
    }
}
