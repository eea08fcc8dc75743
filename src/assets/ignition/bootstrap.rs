//! Bootstrap node ignition config

use crate::assets::installconfig::{install_config_of, InstallConfig};
use crate::assets::kubeconfig::KubeconfigStock;
use crate::assets::tls::{self, TlsStock};
use crate::domain::entities::{Content, State};
use crate::domain::ports::{Asset, Generated, Parents};
use crate::domain::value_objects::{AssetId, OnDiskFiles};
use crate::error::{AssetError, AssetResult};

use super::config::{Config, File, PasswdUser, Unit};
use super::content::{BOOTKUBE_SERVICE, BOOTKUBE_SH, KUBELET_SERVICE};
use super::template::{render, TemplateData};

/// Output path of the bootstrap ignition config
pub const BOOTSTRAP_IGN: &str = "bootstrap.ign";

/// Where bootstrap assets land on the node
const ROOT_DIR: &str = "/opt/tectonic";

const KUBELET_IMAGE: &str = "openshift/origin-node:latest";
const BOOTKUBE_IMAGE: &str = "quay.io/coreos/bootkube:v0.10.0";

/// Handles the bootstrap config reads from
#[derive(Debug, Clone, Copy)]
pub struct BootstrapDeps {
    pub install_config: AssetId,
    pub tls: TlsStock,
    pub kubeconfigs: KubeconfigStock,
}

/// `bootstrap.ign` for the bootstrap node
#[derive(Debug, Clone)]
pub struct Bootstrap {
    deps: BootstrapDeps,
}

impl Bootstrap {
    pub fn new(deps: BootstrapDeps) -> Self {
        Self { deps }
    }

    fn template_data(config: &InstallConfig) -> AssetResult<TemplateData> {
        let etcd_cluster = (0..config.master_count())
            .map(|i| format!("https://{}-etcd-{i}.{}:2379", config.name(), config.base_domain))
            .collect::<Vec<_>>()
            .join(",");

        Ok(TemplateData {
            cluster_dns_ip: config.cluster_dns_ip()?.to_string(),
            cloud_provider: if config.platform.aws.is_some() {
                "aws".to_string()
            } else {
                String::new()
            },
            etcd_cluster,
            kubelet_image: KUBELET_IMAGE.to_string(),
            bootkube_image: BOOTKUBE_IMAGE.to_string(),
        })
    }

    /// Every persisted content of a dependency, placed under `ROOT_DIR`
    fn files_from_state(parents: &Parents, id: AssetId, mode: u32) -> AssetResult<Vec<File>> {
        Ok(parents
            .state(id)?
            .contents()
            .iter()
            .filter(|c| c.is_persisted())
            .map(|c| File::from_bytes(format!("{ROOT_DIR}/{}", c.name), mode, &c.data))
            .collect())
    }
}

impl Asset for Bootstrap {
    fn name(&self) -> &str {
        "Bootstrap Ignition Config"
    }

    fn dependencies(&self) -> Vec<AssetId> {
        let mut deps = vec![self.deps.install_config];
        deps.extend(self.deps.tls.all());
        deps.push(self.deps.kubeconfigs.admin);
        deps.push(self.deps.kubeconfigs.kubelet);
        deps
    }

    fn generate(&self, parents: &Parents, _on_disk: &OnDiskFiles) -> AssetResult<Generated> {
        let install_config = install_config_of(parents, self.deps.install_config)?;
        let data = Self::template_data(&install_config)?;
        let mut config = Config::new();
        let files = &mut config.storage.files;

        let kubelet_kubeconfig = parents.first_data(self.deps.kubeconfigs.kubelet)?;
        files.push(File::from_bytes("/etc/kubernetes/kubeconfig", 0o600, kubelet_kubeconfig));
        files.push(File::from_bytes("/var/lib/kubelet/kubeconfig", 0o600, kubelet_kubeconfig));

        files.push(File::from_bytes(
            format!("{ROOT_DIR}/bootkube.sh"),
            0o555,
            render("bootkube.sh", BOOTKUBE_SH, &data)?.as_bytes(),
        ));
        files.extend(Self::files_from_state(parents, self.deps.kubeconfigs.admin, 0o600)?);

        for id in self.deps.tls.all() {
            files.extend(Self::files_from_state(parents, id, 0o600)?);
        }
        let etcd_ca = parents.data_by_filename(self.deps.tls.etcd_ca, &tls::cert_filename(tls::ETCD_CA))?;
        files.push(File::from_bytes("/etc/ssl/etcd/ca.crt", 0o600, etcd_ca));

        config.systemd.units.push(Unit {
            name: "bootkube.service".to_string(),
            contents: BOOTKUBE_SERVICE.to_string(),
            enabled: None,
        });
        config.systemd.units.push(Unit {
            name: "kubelet.service".to_string(),
            contents: render("kubelet.service", KUBELET_SERVICE, &data)?,
            enabled: Some(true),
        });

        let ssh_key = install_config.admin.ssh_key.trim();
        config.passwd.users.push(PasswdUser {
            name: "core".to_string(),
            ssh_authorized_keys: if ssh_key.is_empty() {
                Vec::new()
            } else {
                vec![ssh_key.to_string()]
            },
        });

        let json = serde_json::to_vec(&config).map_err(|source| AssetError::Json {
            what: BOOTSTRAP_IGN.to_string(),
            source,
        })?;
        Ok(Generated::State(
            State::new().with_content(Content::new(BOOTSTRAP_IGN, json)),
        ))
    }

    fn load(&self, on_disk: &OnDiskFiles) -> AssetResult<Option<State>> {
        Ok(on_disk.load_exact(&[BOOTSTRAP_IGN]))
    }
}
