//! Target value object - which part of the graph a run should produce

use serde::{Deserialize, Serialize};

/// Top-level artifact a run is asked to create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    /// install-config.yml
    InstallConfig,
    /// The whole PKI under tls/
    Tls,
    /// Admin and kubelet kubeconfigs under auth/
    Kubeconfig,
    /// bootstrap.ign
    Ignition,
    /// terraform.tfvars and a provisioned cluster
    Cluster,
}

impl Target {
    pub const ALL: [Target; 5] = [
        Target::InstallConfig,
        Target::Tls,
        Target::Kubeconfig,
        Target::Ignition,
        Target::Cluster,
    ];

    /// Name as accepted on the command line
    pub fn cli_name(&self) -> &'static str {
        match self {
            Target::InstallConfig => "install-config",
            Target::Tls => "tls",
            Target::Kubeconfig => "kubeconfig",
            Target::Ignition => "ignition",
            Target::Cluster => "cluster",
        }
    }

    /// One-line summary of what the target produces
    pub fn description(&self) -> &'static str {
        match self {
            Target::InstallConfig => "install configuration (install-config.yml)",
            Target::Tls => "certificate authorities, certificates and keys (tls/)",
            Target::Kubeconfig => "admin and kubelet kubeconfigs (auth/)",
            Target::Ignition => "bootstrap node ignition config (bootstrap.ign)",
            Target::Cluster => "provisioned infrastructure (terraform.tfstate)",
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cli_name())
    }
}
