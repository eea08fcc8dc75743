//! Kubeconfig files
//!
//! Client configs pointing at the cluster API with the root CA and a
//! client certificate embedded as base64 data.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::assets::installconfig::{install_config_of, InstallConfig};
use crate::assets::tls::{self, cert_key_of, TlsStock};
use crate::domain::entities::{Content, State};
use crate::domain::ports::{Asset, Generated, Parents};
use crate::domain::services::AssetGraph;
use crate::domain::value_objects::{AssetId, OnDiskFiles};
use crate::error::{AssetError, AssetResult};

pub const ADMIN_KUBECONFIG: &str = "auth/kubeconfig";
pub const KUBELET_KUBECONFIG: &str = "auth/kubeconfig-kubelet";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub clusters: Vec<NamedCluster>,
    pub users: Vec<NamedAuthInfo>,
    pub contexts: Vec<NamedContext>,
    pub current_context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCluster {
    pub name: String,
    pub cluster: Cluster,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Cluster {
    pub server: String,
    pub certificate_authority_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedAuthInfo {
    pub name: String,
    pub user: AuthInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AuthInfo {
    pub client_certificate_data: String,
    pub client_key_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedContext {
    pub name: String,
    pub context: Context,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub cluster: String,
    pub user: String,
}

/// Kubeconfig for one client identity
pub struct Kubeconfig {
    name: String,
    path: String,
    user: String,
    root_ca: AssetId,
    client: AssetId,
    client_base: String,
    install_config: AssetId,
}

impl Kubeconfig {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        user: impl Into<String>,
        root_ca: AssetId,
        client: (AssetId, &str),
        install_config: AssetId,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            user: user.into(),
            root_ca,
            client: client.0,
            client_base: client.1.to_string(),
            install_config,
        }
    }

    fn render(&self, config: &InstallConfig, ca_cert: &[u8], client: &tls::CertKeyPem) -> Config {
        let cluster_name = config.name().to_string();
        Config {
            api_version: "v1".to_string(),
            kind: "Config".to_string(),
            clusters: vec![NamedCluster {
                name: cluster_name.clone(),
                cluster: Cluster {
                    server: format!("https://{}-api.{}:6443", config.name(), config.base_domain),
                    certificate_authority_data: STANDARD.encode(ca_cert),
                },
            }],
            users: vec![NamedAuthInfo {
                name: self.user.clone(),
                user: AuthInfo {
                    client_certificate_data: STANDARD.encode(&client.cert_pem),
                    client_key_data: STANDARD.encode(&client.key_pem),
                },
            }],
            contexts: vec![NamedContext {
                name: self.user.clone(),
                context: Context {
                    cluster: cluster_name,
                    user: self.user.clone(),
                },
            }],
            current_context: self.user.clone(),
        }
    }
}

impl Asset for Kubeconfig {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> Vec<AssetId> {
        vec![self.root_ca, self.client, self.install_config]
    }

    fn generate(&self, parents: &Parents, _on_disk: &OnDiskFiles) -> AssetResult<Generated> {
        let config = install_config_of(parents, self.install_config)?;
        let ca_cert = parents.data_by_filename(self.root_ca, &tls::cert_filename(tls::ROOT_CA))?;
        let client = cert_key_of(parents, self.client, &self.client_base)?;

        let kubeconfig = self.render(&config, ca_cert, &client);
        let yaml = serde_yaml_ng::to_string(&kubeconfig).map_err(|source| AssetError::Yaml {
            what: self.path.clone(),
            source,
        })?;

        Ok(Generated::State(
            State::new().with_content(Content::new(self.path.clone(), yaml)),
        ))
    }

    fn load(&self, on_disk: &OnDiskFiles) -> AssetResult<Option<State>> {
        Ok(on_disk.load_exact(&[&self.path]))
    }
}

/// Handles of the kubeconfig assets
#[derive(Debug, Clone, Copy)]
pub struct KubeconfigStock {
    pub admin: AssetId,
    pub kubelet: AssetId,
}

impl KubeconfigStock {
    pub fn establish(graph: &mut AssetGraph, install_config: AssetId, tls: &TlsStock) -> Self {
        let admin = graph.add(Kubeconfig::new(
            "Kubeconfig Admin",
            ADMIN_KUBECONFIG,
            "admin",
            tls.root_ca,
            (tls.admin, tls::ADMIN),
            install_config,
        ));
        let kubelet = graph.add(Kubeconfig::new(
            "Kubeconfig Kubelet",
            KUBELET_KUBECONFIG,
            "kubelet",
            tls.root_ca,
            (tls.kubelet, tls::KUBELET),
            install_config,
        ));
        Self { admin, kubelet }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::installconfig::types::sample;
    use crate::assets::installconfig::INSTALL_CONFIG_FILENAME;

    fn id(n: usize) -> AssetId {
        AssetId::from_index(n)
    }

    fn parents() -> Parents {
        Parents::new()
            .with_state(
                id(0),
                "Root CA",
                State::new()
                    .with_content(Content::new("tls/root-ca.key", "ROOT KEY"))
                    .with_content(Content::new("tls/root-ca.crt", "ROOT CERT")),
            )
            .with_state(
                id(1),
                "Admin Cert",
                State::new()
                    .with_content(Content::new("tls/admin.key", "ADMIN KEY"))
                    .with_content(Content::new("tls/admin.crt", "ADMIN CERT")),
            )
            .with_state(
                id(2),
                "Install Config",
                State::new().with_content(Content::new(
                    INSTALL_CONFIG_FILENAME,
                    sample().to_yaml().unwrap(),
                )),
            )
    }

    fn admin() -> Kubeconfig {
        Kubeconfig::new(
            "Kubeconfig Admin",
            ADMIN_KUBECONFIG,
            "admin",
            id(0),
            (id(1), "admin"),
            id(2),
        )
    }

    #[test]
    fn embeds_ca_and_client_material() {
        let Generated::State(state) = admin().generate(&parents(), &OnDiskFiles::new()).unwrap()
        else {
            panic!("expected a state");
        };

        let content = &state.contents()[0];
        assert_eq!(content.name, "auth/kubeconfig");

        let config: Config = serde_yaml_ng::from_slice(&content.data).unwrap();
        assert_eq!(config.current_context, "admin");
        assert_eq!(
            config.clusters[0].cluster.server,
            "https://test-cluster-api.example.com:6443"
        );
        assert_eq!(
            STANDARD
                .decode(&config.clusters[0].cluster.certificate_authority_data)
                .unwrap(),
            b"ROOT CERT"
        );
        assert_eq!(
            STANDARD.decode(&config.users[0].user.client_key_data).unwrap(),
            b"ADMIN KEY"
        );
    }

    #[test]
    fn yaml_uses_kubectl_field_names() {
        let Generated::State(state) = admin().generate(&parents(), &OnDiskFiles::new()).unwrap()
        else {
            panic!("expected a state");
        };
        let yaml = String::from_utf8(state.contents()[0].data.clone()).unwrap();
        for key in [
            "apiVersion",
            "certificate-authority-data",
            "client-certificate-data",
            "current-context",
        ] {
            assert!(yaml.contains(key), "missing {key} in\n{yaml}");
        }
    }

    #[test]
    fn loads_existing_file() {
        let on_disk = OnDiskFiles::new().with_file(ADMIN_KUBECONFIG, "hand edited");
        let state = admin().load(&on_disk).unwrap().unwrap();
        assert_eq!(state.contents()[0].data, b"hand edited");
    }
}
