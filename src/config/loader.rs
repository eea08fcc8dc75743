//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::Environment;
use crate::error::{ForgeError, ForgeResult};

use super::types::Config;

pub const OUTPUT_DIR_ENV: &str = "CLUSTERFORGE_OUTPUT_DIR";
pub const TERRAFORM_ENV: &str = "CLUSTERFORGE_TERRAFORM";
pub const TEMPLATES_DIR_ENV: &str = "CLUSTERFORGE_TEMPLATES_DIR";
pub const LOG_ENV: &str = "CLUSTERFORGE_LOG";

const KNOWN_KEYS: &[&str] = &["output", "dir", "provisioner", "binary", "templates_dir", "log", "level"];

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{suggestion}'?)")?;
        }
        Ok(())
    }
}

/// Effective configuration plus where it came from
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the config was read from, `None` for built-in defaults
    pub source: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> ForgeResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);
    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ForgeError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .iter()
        .map(|dotted| {
            let key = dotted.rsplit('.').next().unwrap_or(dotted).to_string();
            ConfigWarning {
                line: line_of(&content, &key),
                suggestion: closest_key(&key),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Pick the config file, load it and apply environment overrides.
///
/// An explicit path must exist. Without one the user config is used when
/// present, otherwise the built-in defaults.
pub fn resolve(explicit: Option<&Path>, env: &Environment) -> ForgeResult<LoadedConfig> {
    let source = match explicit {
        Some(path) if !path.is_file() => {
            return Err(ForgeError::InvalidConfig {
                file: path.to_path_buf(),
                message: "file not found".to_string(),
            })
        }
        Some(path) => Some(path.to_path_buf()),
        None => user_config_path(env).filter(|path| path.is_file()),
    };

    let mut loaded = LoadedConfig::default();
    if let Some(path) = source {
        tracing::debug!(config = %path.display(), "loading config file");
        let (config, warnings) = load_with_warnings(&path)?;
        loaded = LoadedConfig {
            config,
            source: Some(path),
            warnings,
        };
    }
    loaded.config = with_env_overrides(loaded.config, env);
    Ok(loaded)
}

/// `$XDG_CONFIG_HOME/clusterforge/config.toml`, falling back to the
/// platform config directory.
pub fn user_config_path(env: &Environment) -> Option<PathBuf> {
    env.get("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .map(|dir| dir.join("clusterforge").join("config.toml"))
}

/// Apply environment variable overrides (CLUSTERFORGE_* prefix)
pub fn with_env_overrides(mut config: Config, env: &Environment) -> Config {
    let set = |key: &str| env.get(key).filter(|v| !v.is_empty());

    if let Some(dir) = set(OUTPUT_DIR_ENV) {
        config.output.dir = PathBuf::from(dir);
    }
    if let Some(binary) = set(TERRAFORM_ENV) {
        config.provisioner.binary = PathBuf::from(binary);
    }
    if let Some(dir) = set(TEMPLATES_DIR_ENV) {
        config.provisioner.templates_dir = Some(PathBuf::from(dir));
    }
    if let Some(level) = set(LOG_ENV) {
        config.log.level = level.to_string();
    }

    config
}

fn line_of(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn closest_key(unknown: &str) -> Option<String> {
    KNOWN_KEYS
        .iter()
        .map(|candidate| (edit_distance(unknown, candidate), *candidate))
        .min()
        .filter(|(dist, _)| *dist <= 2)
        .map(|(_, candidate)| candidate.to_string())
}

/// Levenshtein distance over bytes
fn edit_distance(a: &str, b: &str) -> usize {
    let b = b.as_bytes();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, &ca) in a.as_bytes().iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = (above + 1)
                .min(row[j] + 1)
                .min(diagonal + usize::from(ca != cb));
            diagonal = above;
        }
    }

    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("level", "level"), 0);
        assert_eq!(edit_distance("levl", "level"), 1);
        assert_eq!(edit_distance("binray", "binary"), 2);
        assert_eq!(edit_distance("", "dir"), 3);
    }

    #[test]
    fn closest_key_only_for_near_misses() {
        assert_eq!(closest_key("templates_dri"), Some("templates_dir".to_string()));
        assert_eq!(closest_key("completely_unrelated"), None);
    }
}
