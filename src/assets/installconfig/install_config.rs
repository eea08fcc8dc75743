use crate::domain::entities::{Content, State};
use crate::domain::ports::{Asset, Generated, Parents};
use crate::domain::value_objects::{AssetId, OnDiskFiles};
use crate::error::{AssetError, AssetResult};

use super::types::{Admin, InstallConfig, MachinePool, Networking, ObjectMeta, Platform, DEFAULT_REPLICAS};
use super::INSTALL_CONFIG_FILENAME;

/// Handles of the values the install config is assembled from
#[derive(Debug, Clone, Copy)]
pub struct InstallConfigInputs {
    pub cluster_id: AssetId,
    pub email: AssetId,
    pub password: AssetId,
    pub ssh_key: AssetId,
    pub base_domain: AssetId,
    pub cluster_name: AssetId,
    pub pull_secret: AssetId,
    pub platform: AssetId,
}

/// `install-config.yml`, loaded from disk when present
#[derive(Debug, Clone)]
pub struct InstallConfigAsset {
    inputs: InstallConfigInputs,
}

impl InstallConfigAsset {
    pub fn new(inputs: InstallConfigInputs) -> Self {
        Self { inputs }
    }
}

impl Asset for InstallConfigAsset {
    fn name(&self) -> &str {
        "Install Config"
    }

    fn dependencies(&self) -> Vec<AssetId> {
        let i = &self.inputs;
        vec![
            i.cluster_id,
            i.email,
            i.password,
            i.ssh_key,
            i.base_domain,
            i.cluster_name,
            i.pull_secret,
            i.platform,
        ]
    }

    fn generate(&self, parents: &Parents, _on_disk: &OnDiskFiles) -> AssetResult<Generated> {
        let i = &self.inputs;

        let platform: Platform =
            serde_json::from_slice(parents.first_data(i.platform)?).map_err(|source| {
                AssetError::Json {
                    what: "platform".to_string(),
                    source,
                }
            })?;

        let config = InstallConfig {
            metadata: ObjectMeta {
                name: parents.first_text(i.cluster_name)?,
            },
            cluster_id: parents.first_text(i.cluster_id)?,
            admin: Admin {
                email: parents.first_text(i.email)?,
                password: parents.first_text(i.password)?,
                ssh_key: parents.first_text(i.ssh_key)?,
            },
            base_domain: parents.first_text(i.base_domain)?,
            networking: Networking::with_defaults()?,
            machines: ["master", "worker"]
                .into_iter()
                .map(|name| MachinePool {
                    name: name.to_string(),
                    replicas: Some(DEFAULT_REPLICAS),
                })
                .collect(),
            platform,
            pull_secret: parents.first_text(i.pull_secret)?,
        };

        let yaml = config.to_yaml()?;
        Ok(Generated::State(
            State::new().with_content(Content::new(INSTALL_CONFIG_FILENAME, yaml)),
        ))
    }

    fn load(&self, on_disk: &OnDiskFiles) -> AssetResult<Option<State>> {
        let Some(state) = on_disk.load_exact(&[INSTALL_CONFIG_FILENAME]) else {
            return Ok(None);
        };
        // Reject a hand-edited file that no longer parses before anything
        // downstream consumes it.
        InstallConfig::from_state(&state)?;
        Ok(Some(state))
    }
}

/// Parsed install config from a consumer's parents
pub fn install_config_of(parents: &Parents, id: AssetId) -> AssetResult<InstallConfig> {
    InstallConfig::from_state(parents.state(id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::installconfig::types::sample;

    fn id(n: usize) -> AssetId {
        AssetId::from_index(n)
    }

    fn inputs() -> InstallConfigInputs {
        InstallConfigInputs {
            cluster_id: id(0),
            email: id(1),
            password: id(2),
            ssh_key: id(3),
            base_domain: id(4),
            cluster_name: id(5),
            pull_secret: id(6),
            platform: id(7),
        }
    }

    fn value(data: impl Into<Vec<u8>>) -> State {
        State::new().with_content(Content::in_memory(data))
    }

    #[test]
    fn assembles_yaml_from_inputs() {
        let parents = Parents::new()
            .with_state(id(0), "Cluster ID", value("00000000-0000-4000-8000-000000000000"))
            .with_state(id(1), "Email Address", value("admin@example.com"))
            .with_state(id(2), "Password", value("hunter2"))
            .with_state(id(3), "SSH Key", value("ssh-ed25519 AAAA"))
            .with_state(id(4), "Base Domain", value("example.com"))
            .with_state(id(5), "Cluster Name", value("test-cluster"))
            .with_state(id(6), "Pull Secret", value("{}"))
            .with_state(id(7), "Platform", value(r#"{"aws":{"region":"us-east-1"}}"#));

        let generated = InstallConfigAsset::new(inputs())
            .generate(&parents, &OnDiskFiles::new())
            .unwrap();
        let Generated::State(state) = generated else {
            panic!("expected a state");
        };

        assert_eq!(state.contents()[0].name, INSTALL_CONFIG_FILENAME);
        assert_eq!(InstallConfig::from_state(&state).unwrap(), sample());
    }

    #[test]
    fn loads_existing_file() {
        let yaml = sample().to_yaml().unwrap();
        let on_disk = OnDiskFiles::new().with_file(INSTALL_CONFIG_FILENAME, yaml.clone());

        let state = InstallConfigAsset::new(inputs()).load(&on_disk).unwrap().unwrap();
        assert_eq!(state.contents()[0].data, yaml.as_bytes());
    }

    #[test]
    fn unparseable_file_on_disk_is_error() {
        let on_disk = OnDiskFiles::new().with_file(INSTALL_CONFIG_FILENAME, "metadata: [");
        assert!(matches!(
            InstallConfigAsset::new(inputs()).load(&on_disk),
            Err(AssetError::Yaml { .. })
        ));
    }

    #[test]
    fn no_file_means_no_load() {
        assert!(InstallConfigAsset::new(inputs())
            .load(&OnDiskFiles::new())
            .unwrap()
            .is_none());
    }
}
