//! Common test utilities for clusterforge integration tests.
//!
//! This module provides:
//! - `complete_environment`: every install input set
//! - `FakeProvisioner`: scripted stand-in for terraform that counts runs
//! - `TestEnv`: isolated output and config directories plus CLI helpers
//! - `files_under`: recursive snapshot of a directory for assertions

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use clusterforge::domain::ports::{ApplyOutcome, ProvisionError, Provisioner, TemplateSet};
use clusterforge::{CreateOptions, CreateUseCase, Environment, StockContext, Target};
use tempfile::TempDir;

pub const INPUTS: &[(&str, &str)] = &[
    ("CLUSTERFORGE_EMAIL_ADDRESS", "admin@example.com"),
    ("CLUSTERFORGE_PASSWORD", "hunter2"),
    (
        "CLUSTERFORGE_SSH_KEY",
        "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5 admin@example.com",
    ),
    ("CLUSTERFORGE_BASE_DOMAIN", "example.com"),
    ("CLUSTERFORGE_CLUSTER_NAME", "test-cluster"),
    ("CLUSTERFORGE_PULL_SECRET", r#"{"auths":{}}"#),
    ("CLUSTERFORGE_PLATFORM", "aws"),
    ("CLUSTERFORGE_AWS_REGION", "us-east-1"),
];

/// Environment satisfying every user-provided input
pub fn complete_environment() -> Environment {
    Environment::from_pairs(INPUTS.iter().copied())
}

/// What the fake provisioner should report
#[derive(Debug, Clone, Copy)]
pub enum Script {
    Apply,
    FailWithState,
    FailClean,
}

/// Provisioner that never spawns anything
pub struct FakeProvisioner {
    script: Script,
    runs: AtomicUsize,
    templates: Mutex<Vec<String>>,
}

impl FakeProvisioner {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            runs: AtomicUsize::new(0),
            templates: Mutex::new(Vec::new()),
        })
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    pub fn templates(&self) -> Vec<String> {
        self.templates.lock().unwrap().clone()
    }
}

impl Provisioner for FakeProvisioner {
    fn apply(&self, workdir: &Path, templates: &TemplateSet) -> ApplyOutcome {
        self.runs.fetch_add(1, Ordering::SeqCst);
        templates.write_to(workdir).unwrap();
        self.templates
            .lock()
            .unwrap()
            .extend(templates.files().map(|(path, _)| path.to_string()));

        let failure = || ProvisionError::Exit {
            program: "terraform".to_string(),
            step: "apply".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "quota exceeded".to_string(),
        };
        match self.script {
            Script::Apply => ApplyOutcome::Applied(br#"{"version":4}"#.to_vec()),
            Script::FailWithState => ApplyOutcome::Salvaged {
                state: br#"{"version":4,"partial":true}"#.to_vec(),
                error: failure(),
            },
            Script::FailClean => ApplyOutcome::Failed(failure()),
        }
    }
}

/// Run `create <target>` against `dir` with the given collaborators
pub fn create(
    dir: &Path,
    target: Target,
    environment: Environment,
    provisioner: Arc<FakeProvisioner>,
    templates_dir: Option<PathBuf>,
) -> clusterforge::ForgeResult<clusterforge::CreateResult> {
    CreateUseCase::new(StockContext {
        environment: Arc::new(environment),
        provisioner,
        templates_dir,
    })
    .execute(&CreateOptions::new(target).with_output_dir(dir))
}

/// Every regular file under `dir`, keyed by `/`-joined relative path
pub fn files_under(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .map(Result::unwrap)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let rel = entry
                .path()
                .strip_prefix(dir)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            (rel, std::fs::read(entry.path()).unwrap())
        })
        .collect()
}

/// Result of running the clusterforge binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Isolated output and config directories for CLI runs
pub struct TestEnv {
    pub output: TempDir,
    pub config_home: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            output: TempDir::new().unwrap(),
            config_home: TempDir::new().unwrap(),
        }
    }

    pub fn output_path(&self, relative: &str) -> PathBuf {
        self.output.path().join(relative)
    }

    /// Run the binary with a scrubbed environment plus `vars`
    pub fn run(&self, args: &[&str], vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_clusterforge"));
        cmd.env_clear()
            .env("XDG_CONFIG_HOME", self.config_home.path())
            .env("HOME", self.config_home.path())
            .arg("--dir")
            .arg(self.output.path())
            .args(args);
        for (key, value) in vars {
            cmd.env(key, value);
        }

        let output = cmd.output().unwrap();
        TestResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}
