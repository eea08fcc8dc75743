//! Configuration module for clusterforge
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority, applied by the binary)
//! 2. Environment variables (CLUSTERFORGE_*)
//! 3. Config file (`--config`, else ~/.config/clusterforge/config.toml)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{
    load_with_warnings, resolve, user_config_path, with_env_overrides, ConfigWarning, LoadedConfig,
    LOG_ENV, OUTPUT_DIR_ENV, TEMPLATES_DIR_ENV, TERRAFORM_ENV,
};
pub use types::{Config, LogConfig, OutputConfig, ProvisionerConfig};
