//! User-provided values
//!
//! A value comes from an environment variable, or from a file named by a
//! second variable. Interactive prompting is not supported; if neither
//! variable is set the asset fails naming both.

use std::sync::Arc;

use crate::domain::entities::{Content, State};
use crate::domain::ports::{Asset, Generated, Parents};
use crate::domain::value_objects::{AssetId, Environment, OnDiskFiles};
use crate::error::{AssetError, AssetResult};

/// Checks a raw value, returning a human-readable reason on rejection
pub type Validator = fn(&str) -> Result<(), String>;

/// A single value supplied by the user
pub struct UserProvided {
    name: String,
    env_var: String,
    path_env_var: String,
    validator: Option<Validator>,
    skip_when_present: Option<String>,
    environment: Arc<Environment>,
}

impl UserProvided {
    /// `env_var` holds the value itself; `<env_var>_PATH` names a file
    /// holding it.
    pub fn new(
        name: impl Into<String>,
        env_var: impl Into<String>,
        environment: Arc<Environment>,
    ) -> Self {
        let env_var = env_var.into();
        Self {
            name: name.into(),
            path_env_var: format!("{env_var}_PATH"),
            env_var,
            validator: None,
            skip_when_present: None,
            environment,
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Skip generation when `path` is already in the on-disk snapshot.
    pub fn skip_when_present(mut self, path: impl Into<String>) -> Self {
        self.skip_when_present = Some(path.into());
        self
    }

    pub fn env_var(&self) -> &str {
        &self.env_var
    }

    pub fn path_env_var(&self) -> &str {
        &self.path_env_var
    }

    /// Read and validate the value.
    ///
    /// The direct variable wins over the path variable. Values read from a
    /// file have trailing whitespace removed.
    pub fn lookup(&self) -> AssetResult<String> {
        let value = match self.environment.get(&self.env_var) {
            Some(value) => value.to_string(),
            None => match self.environment.get(&self.path_env_var) {
                Some(path) => std::fs::read_to_string(path)
                    .map_err(|e| AssetError::io(path, e))?
                    .trim_end()
                    .to_string(),
                None => String::new(),
            },
        };

        if value.is_empty() {
            return Err(AssetError::MissingInput {
                asset: self.name.clone(),
                env_var: self.env_var.clone(),
                path_env_var: self.path_env_var.clone(),
            });
        }

        if let Some(validate) = self.validator {
            validate(&value).map_err(|message| AssetError::InvalidInput {
                asset: self.name.clone(),
                message,
            })?;
        }

        Ok(value)
    }
}

impl Asset for UserProvided {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> Vec<AssetId> {
        Vec::new()
    }

    fn generate(&self, _parents: &Parents, on_disk: &OnDiskFiles) -> AssetResult<Generated> {
        if let Some(path) = &self.skip_when_present {
            if on_disk.contains(path) {
                return Ok(Generated::Skipped);
            }
        }

        let value = self.lookup()?;
        Ok(Generated::State(
            State::new().with_content(Content::in_memory(value)),
        ))
    }
}

/// Validators for the install inputs
pub mod validate {
    use base64::{engine::general_purpose::STANDARD, Engine};

    pub fn non_empty(value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            return Err("value must not be empty".to_string());
        }
        Ok(())
    }

    pub fn email(value: &str) -> Result<(), String> {
        let invalid = || format!("{value:?} is not a valid email address");
        if value.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
        match value.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && domain.contains('.') && !domain.contains('@') =>
            {
                domain_name(domain).map_err(|_| invalid())
            }
            _ => Err(invalid()),
        }
    }

    /// An OpenSSH public key line: `<type> <base64 blob> [comment]`
    pub fn ssh_public_key(value: &str) -> Result<(), String> {
        let mut fields = value.split_whitespace();
        let (Some(kind), Some(blob)) = (fields.next(), fields.next()) else {
            return Err("SSH key must be '<type> <key> [comment]'".to_string());
        };

        const KINDS: &[&str] = &[
            "ssh-rsa",
            "ssh-ed25519",
            "ssh-dss",
            "ecdsa-sha2-nistp256",
            "ecdsa-sha2-nistp384",
            "ecdsa-sha2-nistp521",
        ];
        if !KINDS.contains(&kind) {
            return Err(format!("unsupported SSH key type {kind:?}"));
        }

        STANDARD
            .decode(blob)
            .map_err(|e| format!("SSH key body is not base64: {e}"))?;
        Ok(())
    }

    /// A single DNS label: lowercase alphanumerics and `-`, at most 63 chars
    pub fn dns_label(value: &str) -> Result<(), String> {
        if value.is_empty() || value.len() > 63 {
            return Err(format!("{value:?} must be 1 to 63 characters"));
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(format!(
                "{value:?} may only contain lowercase letters, digits and '-'"
            ));
        }
        if value.starts_with('-') || value.ends_with('-') {
            return Err(format!("{value:?} must not start or end with '-'"));
        }
        Ok(())
    }

    pub fn domain_name(value: &str) -> Result<(), String> {
        let value = value.strip_suffix('.').unwrap_or(value);
        if value.len() > 253 {
            return Err(format!("{value:?} is longer than 253 characters"));
        }
        value.split('.').try_for_each(dns_label)
    }

    /// Pull secrets are JSON objects
    pub fn json_object(value: &str) -> Result<(), String> {
        match serde_json::from_str::<serde_json::Value>(value) {
            Ok(serde_json::Value::Object(_)) => Ok(()),
            Ok(_) => Err("expected a JSON object".to_string()),
            Err(e) => Err(format!("invalid JSON: {e}")),
        }
    }

    pub fn uri(value: &str) -> Result<(), String> {
        match value.split_once("://") {
            Some((scheme, _))
                if !scheme.is_empty()
                    && scheme
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)) =>
            {
                Ok(())
            }
            _ => Err(format!("{value:?} is not a URI")),
        }
    }
}
