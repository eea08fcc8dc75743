//! Cluster asset: runs the provisioner over the rendered templates

use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::domain::entities::{Content, State};
use crate::domain::ports::{ApplyOutcome, Asset, Generated, Parents, Provisioner, TemplateSet};
use crate::domain::value_objects::{AssetId, OnDiskFiles};
use crate::error::{AssetError, AssetResult};

use super::tfvars::{TerraformVariables, TFVARS};

/// Output path of the provisioner's state
pub const TFSTATE: &str = "terraform.tfstate";

/// The running cluster, represented by the provisioner's state file.
///
/// A failed apply that still left state behind surfaces as
/// `AssetError::Salvaged`, so the partial state is persisted. The next run
/// loads that state file and reports the cluster as on disk without calling
/// the provisioner again.
pub struct Cluster {
    tfvars: AssetId,
    kubeconfig: AssetId,
    provisioner: Arc<dyn Provisioner>,
    templates_dir: Option<PathBuf>,
}

impl Cluster {
    pub fn new(
        tfvars: AssetId,
        kubeconfig: AssetId,
        provisioner: Arc<dyn Provisioner>,
        templates_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            tfvars,
            kubeconfig,
            provisioner,
            templates_dir,
        }
    }

    /// tfvars plus every file under `<templates_dir>/<platform>/`
    fn templates(&self, tfvars: &[u8], platform: &str) -> AssetResult<TemplateSet> {
        let mut templates = TemplateSet::new().with_file(TFVARS, tfvars);

        let Some(root) = &self.templates_dir else {
            return Ok(templates);
        };
        let dir = root.join(platform);
        if !dir.is_dir() {
            return Err(AssetError::Config(format!(
                "no infrastructure templates for platform {platform:?} in {}",
                root.display()
            )));
        }

        for entry in WalkDir::new(&dir).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&dir).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
                AssetError::io(path, source)
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let data = std::fs::read(entry.path()).map_err(|e| AssetError::io(entry.path(), e))?;
            templates.insert(relative_name(&dir, entry.path()), data);
        }

        Ok(templates)
    }
}

fn relative_name(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

impl Asset for Cluster {
    fn name(&self) -> &str {
        "Cluster"
    }

    fn dependencies(&self) -> Vec<AssetId> {
        vec![self.tfvars, self.kubeconfig]
    }

    fn generate(&self, parents: &Parents, _on_disk: &OnDiskFiles) -> AssetResult<Generated> {
        let tfvars = parents.data_by_filename(self.tfvars, TFVARS)?;
        let vars = TerraformVariables::from_json(tfvars)?;
        let templates = self.templates(tfvars, &vars.platform)?;

        let workdir = tempfile::Builder::new()
            .prefix("clusterforge-")
            .tempdir()
            .map_err(|e| AssetError::io(std::env::temp_dir(), e))?;

        tracing::info!(
            platform = %vars.platform,
            templates = templates.len(),
            "running infrastructure provisioner"
        );

        match self.provisioner.apply(workdir.path(), &templates) {
            ApplyOutcome::Applied(state) => Ok(Generated::State(
                State::new().with_content(Content::new(TFSTATE, state)),
            )),
            ApplyOutcome::Salvaged { state, error } => {
                tracing::warn!(error = %error, "provisioner failed; keeping partial state");
                Err(AssetError::Salvaged {
                    state: State::new().with_content(Content::new(TFSTATE, state)),
                    source: Box::new(AssetError::Provision(error)),
                })
            }
            ApplyOutcome::Failed(error) => Err(AssetError::Provision(error)),
        }
    }

    fn load(&self, on_disk: &OnDiskFiles) -> AssetResult<Option<State>> {
        Ok(on_disk.load_exact(&[TFSTATE]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ProvisionError;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Records what it was given and replays a canned outcome
    struct Scripted {
        outcome: fn() -> ApplyOutcome,
        seen: Mutex<Vec<String>>,
    }

    impl Provisioner for Scripted {
        fn apply(&self, workdir: &Path, templates: &TemplateSet) -> ApplyOutcome {
            assert!(workdir.is_dir());
            let mut seen = self.seen.lock().unwrap();
            seen.extend(templates.files().map(|(p, _)| p.to_string()));
            (self.outcome)()
        }
    }

    fn tfvars_state(platform: &str) -> State {
        let vars = TerraformVariables {
            cluster_id: "id".to_string(),
            cluster_name: "test-cluster".to_string(),
            base_domain: "example.com".to_string(),
            platform: platform.to_string(),
            master_count: 3,
            aws_region: None,
            libvirt_uri: None,
            ignition_bootstrap: "{}".to_string(),
        };
        State::new().with_content(Content::new(TFVARS, serde_json::to_vec(&vars).unwrap()))
    }

    fn parents() -> Parents {
        Parents::new()
            .with_state(AssetId::from_index(0), "Terraform Variables", tfvars_state("aws"))
            .with_state(
                AssetId::from_index(1),
                "Kubeconfig Admin",
                State::new().with_content(Content::new("auth/kubeconfig", "k")),
            )
    }

    fn cluster(outcome: fn() -> ApplyOutcome, templates_dir: Option<PathBuf>) -> (Cluster, Arc<Scripted>) {
        let provisioner = Arc::new(Scripted {
            outcome,
            seen: Mutex::new(Vec::new()),
        });
        let cluster = Cluster::new(
            AssetId::from_index(0),
            AssetId::from_index(1),
            provisioner.clone(),
            templates_dir,
        );
        (cluster, provisioner)
    }

    #[test]
    fn applied_state_becomes_tfstate() {
        let (cluster, _) = cluster(|| ApplyOutcome::Applied(b"state".to_vec()), None);

        let generated = cluster.generate(&parents(), &OnDiskFiles::new()).unwrap();

        assert_eq!(
            generated,
            Generated::State(State::new().with_content(Content::new(TFSTATE, "state")))
        );
    }

    #[test]
    fn salvaged_state_is_carried_in_error() {
        let (cluster, _) = cluster(
            || ApplyOutcome::Salvaged {
                state: b"partial".to_vec(),
                error: ProvisionError::MissingState {
                    path: PathBuf::from("x"),
                },
            },
            None,
        );

        let err = cluster.generate(&parents(), &OnDiskFiles::new()).unwrap_err();

        match err {
            AssetError::Salvaged { state, source } => {
                assert_eq!(state.contents()[0].name, TFSTATE);
                assert_eq!(state.contents()[0].data, b"partial");
                assert!(matches!(*source, AssetError::Provision(_)));
            }
            other => panic!("expected Salvaged, got {other:?}"),
        }
    }

    #[test]
    fn partial_state_on_disk_is_loaded_as_is() {
        let (cluster, provisioner) = cluster(|| ApplyOutcome::Applied(Vec::new()), None);
        let on_disk = OnDiskFiles::new().with_file(TFSTATE, "partial");

        let loaded = cluster.load(&on_disk).unwrap().unwrap();

        assert_eq!(loaded.contents()[0].data, b"partial");
        assert!(provisioner.seen.lock().unwrap().is_empty());
        assert_eq!(cluster.load(&OnDiskFiles::new()).unwrap(), None);
    }

    #[test]
    fn failure_without_state_is_provision_error() {
        let (cluster, _) = cluster(
            || {
                ApplyOutcome::Failed(ProvisionError::MissingState {
                    path: PathBuf::from("x"),
                })
            },
            None,
        );
        assert!(matches!(
            cluster.generate(&parents(), &OnDiskFiles::new()),
            Err(AssetError::Provision(_))
        ));
    }

    #[test]
    fn copies_platform_templates() {
        let templates = tempdir().unwrap();
        std::fs::create_dir_all(templates.path().join("aws/modules/vpc")).unwrap();
        std::fs::write(templates.path().join("aws/main.tf"), "# main").unwrap();
        std::fs::write(templates.path().join("aws/modules/vpc/vpc.tf"), "# vpc").unwrap();
        std::fs::create_dir_all(templates.path().join("libvirt")).unwrap();
        std::fs::write(templates.path().join("libvirt/main.tf"), "# other").unwrap();

        let (cluster, provisioner) = cluster(
            || ApplyOutcome::Applied(Vec::new()),
            Some(templates.path().to_path_buf()),
        );
        cluster.generate(&parents(), &OnDiskFiles::new()).unwrap();

        let seen = provisioner.seen.lock().unwrap();
        assert_eq!(*seen, vec![TFVARS, "main.tf", "modules/vpc/vpc.tf"]);
    }

    #[test]
    fn missing_platform_templates_is_error() {
        let templates = tempdir().unwrap();
        let (cluster, _) = cluster(
            || ApplyOutcome::Applied(Vec::new()),
            Some(templates.path().to_path_buf()),
        );
        assert!(matches!(
            cluster.generate(&parents(), &OnDiskFiles::new()),
            Err(AssetError::Config(_))
        ));
    }
}
