//! Terraform Provisioner
//!
//! Runs `terraform init` and `terraform apply` in a prepared working
//! directory and reads back the state file the tool leaves behind.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::domain::ports::{ApplyOutcome, ProvisionError, Provisioner, TemplateSet};

/// State file terraform writes into its working directory
pub const STATE_FILE_NAME: &str = "terraform.tfstate";

/// Provisioner backed by the terraform executable
#[derive(Debug, Clone)]
pub struct TerraformProvisioner {
    binary: PathBuf,
}

impl TerraformProvisioner {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn program(&self) -> String {
        self.binary.display().to_string()
    }

    /// Run one terraform subcommand in `workdir`, capturing stderr.
    fn run(&self, workdir: &Path, step: &str, args: &[&str]) -> Result<(), ProvisionError> {
        tracing::debug!(program = %self.program(), step, "running provisioner step");

        let output = Command::new(&self.binary)
            .arg(step)
            .args(args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ProvisionError::Spawn {
                program: self.program(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProvisionError::Exit {
                program: self.program(),
                step: step.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

impl Default for TerraformProvisioner {
    fn default() -> Self {
        Self::new("terraform")
    }
}

impl Provisioner for TerraformProvisioner {
    fn apply(&self, workdir: &Path, templates: &TemplateSet) -> ApplyOutcome {
        if let Err(e) = templates.write_to(workdir) {
            return ApplyOutcome::Failed(e);
        }

        if let Err(e) = self.run(workdir, "init", &["-input=false"]) {
            tracing::error!(error = %e, "terraform init failed");
            return ApplyOutcome::Failed(e);
        }

        let applied = self.run(workdir, "apply", &["-auto-approve", "-input=false"]);
        let state_path = workdir.join(STATE_FILE_NAME);
        let state = std::fs::read(&state_path);

        match (applied, state) {
            (Ok(()), Ok(state)) => ApplyOutcome::Applied(state),
            (Ok(()), Err(_)) => ApplyOutcome::Failed(ProvisionError::MissingState { path: state_path }),
            (Err(error), Ok(state)) => {
                tracing::error!(error = %error, "terraform apply failed");
                ApplyOutcome::Salvaged { state, error }
            }
            (Err(error), Err(_)) => {
                tracing::error!(error = %error, "terraform apply failed with no state file");
                ApplyOutcome::Failed(error)
            }
        }
    }
}
