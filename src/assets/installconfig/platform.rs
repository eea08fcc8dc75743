use std::sync::Arc;

use crate::assets::user_provided::{validate, UserProvided};
use crate::domain::entities::{Content, State};
use crate::domain::ports::{Asset, Generated, Parents};
use crate::domain::value_objects::{AssetId, Environment, OnDiskFiles};
use crate::error::{AssetError, AssetResult};

use super::types::Platform;
use super::{AWS_REGION_ENV, INSTALL_CONFIG_FILENAME, LIBVIRT_URI_ENV, PLATFORM_ENV};

/// Platform selection plus its platform-specific setting.
///
/// The state holds the `Platform` as in-memory JSON.
pub struct PlatformInput {
    environment: Arc<Environment>,
}

impl PlatformInput {
    pub fn new(environment: Arc<Environment>) -> Self {
        Self { environment }
    }

    fn input(&self, name: &str, var: &str) -> UserProvided {
        UserProvided::new(name, var, Arc::clone(&self.environment))
    }

    pub fn lookup(&self) -> AssetResult<Platform> {
        let platform = self
            .input("Platform", PLATFORM_ENV)
            .with_validator(|value| match value {
                "aws" | "libvirt" => Ok(()),
                other => Err(format!("unsupported platform {other:?}, expected aws or libvirt")),
            })
            .lookup()?;

        match platform.as_str() {
            "aws" => {
                let region = self
                    .input("AWS Region", AWS_REGION_ENV)
                    .with_validator(validate::dns_label)
                    .lookup()?;
                Ok(Platform::aws(region))
            }
            _ => {
                let uri = self
                    .input("Libvirt Connection URI", LIBVIRT_URI_ENV)
                    .with_validator(validate::uri)
                    .lookup()?;
                Ok(Platform::libvirt(uri))
            }
        }
    }
}

impl Asset for PlatformInput {
    fn name(&self) -> &str {
        "Platform"
    }

    fn dependencies(&self) -> Vec<AssetId> {
        Vec::new()
    }

    fn generate(&self, _parents: &Parents, on_disk: &OnDiskFiles) -> AssetResult<Generated> {
        if on_disk.contains(INSTALL_CONFIG_FILENAME) {
            return Ok(Generated::Skipped);
        }

        let platform = self.lookup()?;
        let data = serde_json::to_vec(&platform).map_err(|source| AssetError::Json {
            what: "platform".to_string(),
            source,
        })?;
        Ok(Generated::State(
            State::new().with_content(Content::in_memory(data)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> AssetResult<Platform> {
        PlatformInput::new(Arc::new(Environment::from_pairs(pairs.iter().copied()))).lookup()
    }

    #[test]
    fn aws_with_region() {
        let platform = lookup(&[(PLATFORM_ENV, "aws"), (AWS_REGION_ENV, "us-west-2")]).unwrap();
        assert_eq!(platform, Platform::aws("us-west-2"));
    }

    #[test]
    fn libvirt_with_uri() {
        let platform = lookup(&[
            (PLATFORM_ENV, "libvirt"),
            (LIBVIRT_URI_ENV, "qemu+tcp://192.168.122.1/system"),
        ])
        .unwrap();
        assert_eq!(platform.name(), "libvirt");
    }

    #[test]
    fn aws_without_region_is_missing_input() {
        let err = lookup(&[(PLATFORM_ENV, "aws")]).unwrap_err();
        assert!(matches!(err, AssetError::MissingInput { env_var, .. } if env_var == AWS_REGION_ENV));
    }

    #[test]
    fn unknown_platform_is_rejected() {
        let err = lookup(&[(PLATFORM_ENV, "openstack")]).unwrap_err();
        assert!(matches!(err, AssetError::InvalidInput { .. }));
    }
}
