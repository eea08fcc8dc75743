//! Error types for clusterforge
//!
//! Uses `thiserror` for library errors. `AssetError` is what flows through the
//! dependency graph; `ForgeError` is what the application layer hands back to
//! the binary.

use std::path::PathBuf;
use thiserror::Error;

use crate::assets::tls::PkiError;
use crate::domain::entities::State;
use crate::domain::ports::ProvisionError;
use crate::domain::value_objects::AssetId;

/// Result type alias for clusterforge operations
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Result type alias for asset generation
pub type AssetResult<T> = Result<T, AssetError>;

/// Errors raised while resolving or generating assets
#[derive(Error, Debug)]
pub enum AssetError {
    /// A node was re-entered while its own resolution was still in flight
    #[error("dependency cycle detected at asset '{asset}'")]
    Cycle { asset: String },

    /// A node already failed earlier in this run; `cause` is the rendered
    /// chain of that first failure
    #[error("asset '{asset}' failed earlier in this run: {cause}")]
    PreviouslyFailed { asset: String, cause: String },

    /// A handle that does not belong to the graph
    #[error("unknown asset handle {0}")]
    UnknownAsset(AssetId),

    /// The asset's own generator failed
    #[error("failed to generate asset '{asset}'")]
    Generate {
        asset: String,
        #[source]
        source: Box<AssetError>,
    },

    /// One of the asset's dependencies failed
    #[error("failed to resolve dependencies of '{asset}'")]
    Dependency {
        asset: String,
        #[source]
        source: Box<AssetError>,
    },

    /// The generated state could not be written out
    #[error("failed to persist asset '{asset}'")]
    Persist {
        asset: String,
        #[source]
        source: Box<AssetError>,
    },

    /// The dependency map has no state for a declared parent
    #[error("failed to find state of '{asset}' in parents")]
    MissingState { asset: String },

    /// A parent state has no content with the expected basename
    #[error("failed to find data in '{asset}' with filename == {filename:?}")]
    MissingContent { asset: String, filename: String },

    /// Malformed glob pattern for on-disk lookups
    #[error("invalid file pattern {pattern:?}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// I/O error, always tied to the path involved
    #[error("I/O error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A user-provided value was not supplied
    #[error("no value for '{asset}': set {env_var} or {path_env_var}")]
    MissingInput {
        asset: String,
        env_var: String,
        path_env_var: String,
    },

    /// A user-provided value failed validation
    #[error("invalid value for '{asset}': {message}")]
    InvalidInput { asset: String, message: String },

    /// Invalid configuration material (subjects, CIDRs, ...)
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A bootstrap template failed to render
    #[error("failed to render template {name}")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// YAML (de)serialization failure
    #[error("failed to process {what} as YAML")]
    Yaml {
        what: String,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// JSON (de)serialization failure
    #[error("failed to process {what} as JSON")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// Certificate or key material could not be produced
    #[error(transparent)]
    Pki(#[from] PkiError),

    /// External provisioner failure
    #[error(transparent)]
    Provision(#[from] ProvisionError),

    /// Failure that still produced a partial state worth keeping on disk.
    /// The resolver persists `state` and then surfaces `source`.
    #[error("{source}")]
    Salvaged {
        state: State,
        #[source]
        source: Box<AssetError>,
    },
}

impl AssetError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AssetError::Io {
            path: path.into(),
            source,
        }
    }

    /// The error and every source below it, joined with `": "`
    pub fn chain(&self) -> String {
        let mut rendered = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            rendered.push_str(": ");
            rendered.push_str(&err.to_string());
            source = err.source();
        }
        rendered
    }

    /// Walk through the asset-name context wrappers to the failure that
    /// started the chain.
    pub fn innermost(&self) -> &AssetError {
        match self {
            AssetError::Generate { source, .. }
            | AssetError::Dependency { source, .. }
            | AssetError::Persist { source, .. }
            | AssetError::Salvaged { source, .. } => source.innermost(),
            other => other,
        }
    }

    /// Names of the assets the error passed through, outermost first.
    pub fn asset_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = self;
        loop {
            match current {
                AssetError::Generate { asset, source }
                | AssetError::Dependency { asset, source }
                | AssetError::Persist { asset, source } => {
                    path.push(asset.as_str());
                    current = source;
                }
                AssetError::Salvaged { source, .. } => current = source,
                AssetError::Cycle { asset } | AssetError::PreviouslyFailed { asset, .. } => {
                    path.push(asset.as_str());
                    return path;
                }
                _ => return path,
            }
        }
    }
}

/// Main error type for clusterforge operations
#[derive(Error, Debug)]
pub enum ForgeError {
    /// Config file could not be parsed
    #[error("invalid config file {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Another run holds the output directory
    #[error("output directory {dir} is locked by another run")]
    Locked { dir: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Asset resolution failed
    #[error(transparent)]
    Asset(#[from] AssetError),
}
