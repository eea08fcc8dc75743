use serde::{Deserialize, Serialize};

use crate::assets::ignition::BOOTSTRAP_IGN;
use crate::assets::installconfig::install_config_of;
use crate::domain::entities::{Content, State};
use crate::domain::ports::{Asset, Generated, Parents};
use crate::domain::value_objects::{AssetId, OnDiskFiles};
use crate::error::{AssetError, AssetResult};

/// Output path of the terraform variables
pub const TFVARS: &str = "terraform.tfvars";

/// Variables handed to the infrastructure templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerraformVariables {
    pub cluster_id: String,
    pub cluster_name: String,
    pub base_domain: String,
    pub platform: String,
    pub master_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub libvirt_uri: Option<String>,
    pub ignition_bootstrap: String,
}

impl TerraformVariables {
    pub fn from_json(data: &[u8]) -> AssetResult<Self> {
        serde_json::from_slice(data).map_err(|source| AssetError::Json {
            what: TFVARS.to_string(),
            source,
        })
    }
}

/// `terraform.tfvars` (JSON syntax)
#[derive(Debug, Clone)]
pub struct TfvarsAsset {
    install_config: AssetId,
    bootstrap: AssetId,
}

impl TfvarsAsset {
    pub fn new(install_config: AssetId, bootstrap: AssetId) -> Self {
        Self {
            install_config,
            bootstrap,
        }
    }
}

impl Asset for TfvarsAsset {
    fn name(&self) -> &str {
        "Terraform Variables"
    }

    fn dependencies(&self) -> Vec<AssetId> {
        vec![self.install_config, self.bootstrap]
    }

    fn generate(&self, parents: &Parents, _on_disk: &OnDiskFiles) -> AssetResult<Generated> {
        let config = install_config_of(parents, self.install_config)?;
        let ignition = parents.data_by_filename(self.bootstrap, BOOTSTRAP_IGN)?;

        let vars = TerraformVariables {
            cluster_id: config.cluster_id.clone(),
            cluster_name: config.name().to_string(),
            base_domain: config.base_domain.clone(),
            platform: config.platform.name().to_string(),
            master_count: config.master_count(),
            aws_region: config.platform.aws.as_ref().map(|aws| aws.region.clone()),
            libvirt_uri: config.platform.libvirt.as_ref().map(|l| l.uri.clone()),
            ignition_bootstrap: String::from_utf8_lossy(ignition).into_owned(),
        };

        let json = serde_json::to_vec_pretty(&vars).map_err(|source| AssetError::Json {
            what: TFVARS.to_string(),
            source,
        })?;
        Ok(Generated::State(
            State::new().with_content(Content::new(TFVARS, json)),
        ))
    }

    fn load(&self, on_disk: &OnDiskFiles) -> AssetResult<Option<State>> {
        Ok(on_disk.load_exact(&[TFVARS]))
    }
}
