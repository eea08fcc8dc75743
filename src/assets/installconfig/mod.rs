//! Install configuration family
//!
//! User inputs, the cluster ID and the `install-config.yml` document built
//! from them. Every input skips itself once the document exists on disk.

mod cluster_id;
mod install_config;
mod platform;
pub mod types;

use std::sync::Arc;

pub use cluster_id::ClusterId;
pub use install_config::{install_config_of, InstallConfigAsset, InstallConfigInputs};
pub use platform::PlatformInput;
pub use types::{InstallConfig, Ipv4Cidr, Platform};

use crate::assets::user_provided::{validate, UserProvided, Validator};
use crate::domain::services::AssetGraph;
use crate::domain::value_objects::{AssetId, Environment};

/// Output path of the install configuration
pub const INSTALL_CONFIG_FILENAME: &str = "install-config.yml";

pub const EMAIL_ENV: &str = "CLUSTERFORGE_EMAIL_ADDRESS";
pub const PASSWORD_ENV: &str = "CLUSTERFORGE_PASSWORD";
pub const SSH_KEY_ENV: &str = "CLUSTERFORGE_SSH_KEY";
pub const BASE_DOMAIN_ENV: &str = "CLUSTERFORGE_BASE_DOMAIN";
pub const CLUSTER_NAME_ENV: &str = "CLUSTERFORGE_CLUSTER_NAME";
pub const PULL_SECRET_ENV: &str = "CLUSTERFORGE_PULL_SECRET";
pub const PLATFORM_ENV: &str = "CLUSTERFORGE_PLATFORM";
pub const AWS_REGION_ENV: &str = "CLUSTERFORGE_AWS_REGION";
pub const LIBVIRT_URI_ENV: &str = "CLUSTERFORGE_LIBVIRT_URI";

/// Handles of the install configuration family
#[derive(Debug, Clone, Copy)]
pub struct InstallConfigStock {
    pub inputs: InstallConfigInputs,
    pub install_config: AssetId,
}

impl InstallConfigStock {
    pub fn establish(graph: &mut AssetGraph, environment: &Arc<Environment>) -> Self {
        let input = |name: &str, var: &str, validator: Validator| {
            UserProvided::new(name, var, Arc::clone(environment))
                .with_validator(validator)
                .skip_when_present(INSTALL_CONFIG_FILENAME)
        };

        let inputs = InstallConfigInputs {
            cluster_id: graph.add(ClusterId),
            email: graph.add(input("Email Address", EMAIL_ENV, validate::email)),
            password: graph.add(input("Password", PASSWORD_ENV, validate::non_empty)),
            ssh_key: graph.add(input("SSH Key", SSH_KEY_ENV, validate::ssh_public_key)),
            base_domain: graph.add(input("Base Domain", BASE_DOMAIN_ENV, validate::domain_name)),
            cluster_name: graph.add(input("Cluster Name", CLUSTER_NAME_ENV, validate::dns_label)),
            pull_secret: graph.add(input("Pull Secret", PULL_SECRET_ENV, validate::json_object)),
            platform: graph.add(PlatformInput::new(Arc::clone(environment))),
        };
        let install_config = graph.add(InstallConfigAsset::new(inputs));

        Self {
            inputs,
            install_config,
        }
    }
}
